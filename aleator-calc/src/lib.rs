//! Aleator Calc - Lazy probability calculation graph
//!
//! Random-variable expressions compose symbolically (`prior * likelihood
//! / evidence`) into an immutable node tree and evaluate lazily through a
//! shared [`CalculationContext`]. The context memoizes every
//! sub-expression by its deterministic name, which guarantees that a
//! distribution appearing twice in one expression is sampled exactly
//! once - `X - X` is identically zero, not the difference of two
//! independent draws.
//!
//! Contexts are shared single-threaded via `Rc<RefCell<_>>`; nothing
//! here is `Send` or `Sync`.

mod bayes;
mod context;
mod expr;
mod node;
mod ops;
mod sync;

pub use bayes::{BayesTerm, BinaryBayesRule, DirichletLikelihood, MultipleBayesRule, Posterior};
pub use context::{CalculationContext, SharedContext};
pub use expr::{ArrayInput, Expr, ExprFrame, ExprSeries, DEFAULT_NUM_SAMPLES};
pub use node::{Calculation, SampleSource};
pub use ops::{AggregateOp, ArrayOp, BinaryOp, UnaryOp};
pub use sync::{sync_context, sync_context_with, SyncContext};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        sync_context, ArrayInput, BayesTerm, BinaryBayesRule, CalculationContext, Expr,
        ExprFrame, ExprSeries, MultipleBayesRule, Posterior, SharedContext, SyncContext,
        DEFAULT_NUM_SAMPLES,
    };
}
