//! Calculation node tree
//!
//! One tagged union covers every node kind: constant leaves, sampling
//! leaves, and the unary/binary/aggregate/array composites. Nodes are
//! immutable and carry no context; evaluation threads a
//! [`CalculationContext`] through explicitly.
//!
//! A node's `name()` is its memoization fingerprint: deterministic,
//! computed from the children's names and the operator, with composite
//! operands parenthesized. Evaluating a name already present in the
//! context is a cache hit and returns bit-identical values.

use crate::context::CalculationContext;
use crate::ops::{AggregateOp, ArrayOp, BinaryOp, UnaryOp};
use aleator_core::{AleatorError, CalcValue};
use aleator_dist::{RandomVariable, RandomVector};
use rand::RngCore;
use std::fmt;
use std::rc::Rc;

/// The distribution behind a sampling leaf.
#[derive(Clone)]
pub enum SampleSource {
    Univariate(Rc<dyn RandomVariable>),
    Multivariate(Rc<dyn RandomVector>),
}

impl SampleSource {
    /// The distribution's stable display name.
    pub fn name(&self) -> String {
        match self {
            SampleSource::Univariate(d) => d.to_string(),
            SampleSource::Multivariate(d) => d.to_string(),
        }
    }

    fn draw(&self, num_samples: usize, rng: &mut dyn RngCore) -> CalcValue {
        match self {
            SampleSource::Univariate(d) => d.sample(num_samples, rng).into(),
            SampleSource::Multivariate(d) => d.sample_vector(num_samples, rng).into(),
        }
    }
}

impl fmt::Debug for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleSource({})", self.name())
    }
}

/// A node of the lazy calculation tree.
#[derive(Debug, Clone)]
pub enum Calculation {
    /// A constant.
    Value(f64),
    /// Draws from a distribution; sampled at most once per context.
    Sample(SampleSource),
    Unary {
        op: UnaryOp,
        input: Rc<Calculation>,
    },
    Binary {
        op: BinaryOp,
        lhs: Rc<Calculation>,
        rhs: Rc<Calculation>,
    },
    Aggregate {
        op: AggregateOp,
        input: Rc<Calculation>,
    },
    Array {
        op: ArrayOp,
        inputs: Vec<Rc<Calculation>>,
    },
}

impl Calculation {
    /// Leaves render their name bare inside composite names; composites
    /// get parenthesized.
    pub fn is_simple(&self) -> bool {
        matches!(self, Calculation::Value(_) | Calculation::Sample(_))
    }

    fn bracketed_name(&self) -> String {
        if self.is_simple() {
            self.name()
        } else {
            format!("({})", self.name())
        }
    }

    /// The deterministic memoization fingerprint of this node.
    pub fn name(&self) -> String {
        match self {
            Calculation::Value(v) => format!("{}", v),
            Calculation::Sample(source) => source.name(),
            Calculation::Unary { op, input } => op.get_name(&input.name()),
            Calculation::Binary { op, lhs, rhs } => {
                op.get_name(&lhs.bracketed_name(), &rhs.bracketed_name())
            }
            Calculation::Aggregate { op, input } => op.get_name(&input.name()),
            Calculation::Array { op, inputs } => {
                let names: Vec<String> = inputs.iter().map(|i| i.name()).collect();
                op.get_name(&names)
            }
        }
    }

    /// The node's direct inputs, in evaluation order.
    pub fn inputs(&self) -> Vec<&Rc<Calculation>> {
        match self {
            Calculation::Value(_) | Calculation::Sample(_) => vec![],
            Calculation::Unary { input, .. } | Calculation::Aggregate { input, .. } => {
                vec![input]
            }
            Calculation::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Calculation::Array { inputs, .. } => inputs.iter().collect(),
        }
    }

    /// Evaluate this node within `ctx`, drawing `num_samples` per
    /// distribution.
    ///
    /// Inputs are resolved in order, each through the context cache, so
    /// a sub-expression appearing anywhere else in the tree - or a
    /// distribution appearing twice - is computed exactly once.
    pub fn output_in(
        &self,
        ctx: &mut CalculationContext,
        num_samples: usize,
    ) -> Result<CalcValue, AleatorError> {
        let name = self.name();
        if ctx.has_object_named(&name) {
            tracing::trace!(expression = %name, "context cache hit");
            return ctx.get(&name);
        }
        let result = match self {
            Calculation::Value(v) => CalcValue::Scalar(*v),
            Calculation::Sample(source) => {
                tracing::debug!(distribution = %name, num_samples, "drawing samples");
                source.draw(num_samples, ctx.rng_mut())
            }
            Calculation::Unary { op, input } => {
                let value = Self::resolve_input(input, ctx, num_samples)?;
                op.operate(&value)?
            }
            Calculation::Binary { op, lhs, rhs } => {
                let value_1 = Self::resolve_input(lhs, ctx, num_samples)?;
                let value_2 = Self::resolve_input(rhs, ctx, num_samples)?;
                op.operate(&value_1, &value_2, !lhs.is_simple(), !rhs.is_simple())?
            }
            Calculation::Aggregate { op, input } => {
                let value = Self::resolve_input(input, ctx, num_samples)?;
                op.operate(&value)?
            }
            Calculation::Array { op, inputs } => {
                let values = inputs
                    .iter()
                    .map(|input| Self::resolve_input(input, ctx, num_samples))
                    .collect::<Result<Vec<_>, _>>()?;
                op.operate(&values)?
            }
        };
        ctx.set(name, result.clone());
        Ok(result)
    }

    fn resolve_input(
        input: &Calculation,
        ctx: &mut CalculationContext,
        num_samples: usize,
    ) -> Result<CalcValue, AleatorError> {
        let input_name = input.name();
        if ctx.has_object_named(&input_name) {
            ctx.get(&input_name)
        } else {
            // output_in caches under the input's own name
            input.output_in(ctx, num_samples)
        }
    }
}
