//! Aleator - a probability toolkit
//!
//! Two independent subsystems behind one surface:
//!
//! - **Calculation graphs** ([`aleator_calc`]): random-variable
//!   expressions built with ordinary arithmetic syntax, evaluated lazily
//!   through a shared memoizing context so that every distribution is
//!   sampled at most once per context. See [`Expr`], [`sync_context`]
//!   and the Bayes-rule helpers.
//! - **Discrete probability algebra** ([`aleator_discrete`]): labeled
//!   joint and conditional probability tables with marginalization,
//!   conditioning, filtering and chain-rule multiplication. See
//!   [`Discrete`] and [`Conditional`].
//!
//! Distributions ([`aleator_dist`]) enter the graph through the
//! [`RandomVariable`]/[`RandomVector`] capability traits; their display
//! strings are stable identities used as memoization keys.

pub use aleator_calc::{
    sync_context, sync_context_with, AggregateOp, ArrayInput, ArrayOp, BayesTerm, BinaryBayesRule,
    BinaryOp, Calculation, CalculationContext, DirichletLikelihood, Expr, ExprFrame, ExprSeries,
    MultipleBayesRule, Posterior, SampleSource, SharedContext, SyncContext, UnaryOp,
    DEFAULT_NUM_SAMPLES,
};
pub use aleator_core::{AleatorError, CalcValue, SampleFrame, Samples};
pub use aleator_discrete::{
    states, valid_name_comparator, Comparator, Conditional, Discrete, DiscreteError, Filter,
    FilterValue, GivenResult, IntoStateKey, ProbTable, State,
};
pub use aleator_dist::{
    Beta, ContinuousUniform, Dirichlet, DistributionError, Gamma, Normal, RandomVariable,
    RandomVector,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use aleator_calc::prelude::*;
    pub use aleator_core::prelude::*;
    pub use aleator_discrete::prelude::*;
    pub use aleator_dist::prelude::*;
}
