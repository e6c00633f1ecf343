//! Expression builder front-end
//!
//! `Expr` is the one type carrying arithmetic operator overloads.
//! Distributions themselves stay arithmetic-free; an expression starts
//! from an explicit entry point (`Expr::value`, `Expr::sample`,
//! `Expr::sample_vector`) and composes with ordinary `*`, `+`, `/`
//! syntax. Each builder carries its context explicitly; combining two
//! expressions adopts the left operand's context, so chained expressions
//! share one cache without any sync call.

use crate::context::{CalculationContext, SharedContext};
use crate::node::{Calculation, SampleSource};
use crate::ops::{AggregateOp, ArrayOp, BinaryOp, UnaryOp};
use aleator_core::{AleatorError, CalcValue};
use aleator_dist::{RandomVariable, RandomVector};
use std::rc::Rc;

/// Sample count used when a caller does not give one.
pub const DEFAULT_NUM_SAMPLES: usize = 100_000;

fn fresh_context() -> SharedContext {
    CalculationContext::new().into_shared()
}

/// A calculation tree plus the context it evaluates in.
#[derive(Debug, Clone)]
pub struct Expr {
    node: Rc<Calculation>,
    ctx: SharedContext,
}

impl Expr {
    fn from_node(node: Rc<Calculation>, ctx: SharedContext) -> Self {
        Self { node, ctx }
    }

    // ========== Entry points ==========

    /// Start an expression from a constant, in a fresh context.
    pub fn value(value: f64) -> Self {
        Self::value_in(value, &fresh_context())
    }

    /// Start an expression from a constant, in an existing context.
    pub fn value_in(value: f64, ctx: &SharedContext) -> Self {
        Self::from_node(Rc::new(Calculation::Value(value)), ctx.clone())
    }

    /// Start an expression from a univariate distribution, in a fresh
    /// context.
    pub fn sample(distribution: Rc<dyn RandomVariable>) -> Self {
        Self::sample_in(distribution, &fresh_context())
    }

    /// Start an expression from a univariate distribution, in an
    /// existing context.
    pub fn sample_in(distribution: Rc<dyn RandomVariable>, ctx: &SharedContext) -> Self {
        Self::from_node(
            Rc::new(Calculation::Sample(SampleSource::Univariate(distribution))),
            ctx.clone(),
        )
    }

    /// Start an expression from a multivariate distribution, in a fresh
    /// context.
    pub fn sample_vector(distribution: Rc<dyn RandomVector>) -> Self {
        Self::sample_vector_in(distribution, &fresh_context())
    }

    /// Start an expression from a multivariate distribution, in an
    /// existing context.
    pub fn sample_vector_in(distribution: Rc<dyn RandomVector>, ctx: &SharedContext) -> Self {
        Self::from_node(
            Rc::new(Calculation::Sample(SampleSource::Multivariate(distribution))),
            ctx.clone(),
        )
    }

    // ========== Inspection ==========

    /// The expression's deterministic name (its memoization key).
    pub fn name(&self) -> String {
        self.node.name()
    }

    pub fn node(&self) -> &Rc<Calculation> {
        &self.node
    }

    pub fn context(&self) -> &SharedContext {
        &self.ctx
    }

    pub(crate) fn set_context(&mut self, ctx: &SharedContext) {
        self.ctx = ctx.clone();
    }

    // ========== Evaluation ==========

    /// Evaluate, drawing `num_samples` per distribution not already
    /// sampled in this context.
    pub fn output(&self, num_samples: usize) -> Result<CalcValue, AleatorError> {
        self.node.output_in(&mut self.ctx.borrow_mut(), num_samples)
    }

    /// Evaluate with [`DEFAULT_NUM_SAMPLES`].
    pub fn output_default(&self) -> Result<CalcValue, AleatorError> {
        self.output(DEFAULT_NUM_SAMPLES)
    }

    // ========== Composition ==========

    fn binary(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Expr {
        Expr::from_node(
            Rc::new(Calculation::Binary {
                op,
                lhs: lhs.node.clone(),
                rhs: rhs.node.clone(),
            }),
            lhs.ctx.clone(),
        )
    }

    fn binary_scalar_rhs(op: BinaryOp, lhs: &Expr, value: f64) -> Expr {
        let rhs = Expr::value_in(value, &lhs.ctx);
        Expr::binary(op, lhs, &rhs)
    }

    fn binary_scalar_lhs(op: BinaryOp, value: f64, rhs: &Expr) -> Expr {
        let lhs = Expr::value_in(value, &rhs.ctx);
        Expr::binary(op, &lhs, rhs)
    }

    /// The probability complement `1 - self`, on the same samples.
    pub fn complement(&self) -> Expr {
        Expr::from_node(
            Rc::new(Calculation::Unary {
                op: UnaryOp::Complement,
                input: self.node.clone(),
            }),
            self.ctx.clone(),
        )
    }

    /// Row-wise sum of a table-valued expression.
    pub fn sum(&self) -> Expr {
        Expr::from_node(
            Rc::new(Calculation::Aggregate {
                op: AggregateOp::Sum,
                input: self.node.clone(),
            }),
            self.ctx.clone(),
        )
    }

    // ========== Array operators ==========

    pub fn min_of(inputs: Vec<ArrayInput>) -> Result<Expr, AleatorError> {
        Self::array(ArrayOp::Min, inputs)
    }

    pub fn max_of(inputs: Vec<ArrayInput>) -> Result<Expr, AleatorError> {
        Self::array(ArrayOp::Max, inputs)
    }

    pub fn mean_of(inputs: Vec<ArrayInput>) -> Result<Expr, AleatorError> {
        Self::array(ArrayOp::Mean, inputs)
    }

    pub fn median_of(inputs: Vec<ArrayInput>) -> Result<Expr, AleatorError> {
        Self::array(ArrayOp::Median, inputs)
    }

    /// Normalize mixed inputs onto one shared context and build the
    /// array node. Pre-built expressions spanning more than one distinct
    /// context are rejected: array operands must be comparable within a
    /// single sampling context.
    fn array(op: ArrayOp, inputs: Vec<ArrayInput>) -> Result<Expr, AleatorError> {
        let mut contexts: Vec<SharedContext> = Vec::new();
        for input in &inputs {
            if let ArrayInput::Expr(e) = input {
                if !contexts.iter().any(|c| Rc::ptr_eq(c, &e.ctx)) {
                    contexts.push(e.ctx.clone());
                }
            }
        }
        let ctx = match contexts.len() {
            0 => fresh_context(),
            1 => contexts.remove(0),
            n => return Err(AleatorError::MixedContexts(n)),
        };
        let nodes = inputs
            .into_iter()
            .map(|input| match input {
                ArrayInput::Value(v) => Rc::new(Calculation::Value(v)),
                ArrayInput::Dist(d) => {
                    Rc::new(Calculation::Sample(SampleSource::Univariate(d)))
                }
                ArrayInput::Expr(e) => e.node,
            })
            .collect();
        Ok(Expr::from_node(
            Rc::new(Calculation::Array { op, inputs: nodes }),
            ctx,
        ))
    }
}

/// One operand of an array operator.
pub enum ArrayInput {
    Value(f64),
    Dist(Rc<dyn RandomVariable>),
    Expr(Expr),
}

impl From<f64> for ArrayInput {
    fn from(v: f64) -> Self {
        ArrayInput::Value(v)
    }
}

impl From<Expr> for ArrayInput {
    fn from(e: Expr) -> Self {
        ArrayInput::Expr(e)
    }
}

impl From<Rc<dyn RandomVariable>> for ArrayInput {
    fn from(d: Rc<dyn RandomVariable>) -> Self {
        ArrayInput::Dist(d)
    }
}

// ========== Operator sugar ==========

macro_rules! impl_expr_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, &self, &rhs)
            }
        }

        impl std::ops::$trait for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                Expr::binary($op, self, rhs)
            }
        }

        impl std::ops::$trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                Expr::binary_scalar_rhs($op, &self, rhs)
            }
        }

        impl std::ops::$trait<f64> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                Expr::binary_scalar_rhs($op, self, rhs)
            }
        }

        impl std::ops::$trait<Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary_scalar_lhs($op, self, &rhs)
            }
        }

        impl std::ops::$trait<&Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                Expr::binary_scalar_lhs($op, self, rhs)
            }
        }
    };
}

impl_expr_binary_op!(Mul, mul, BinaryOp::Multiply);
impl_expr_binary_op!(Add, add, BinaryOp::Add);
impl_expr_binary_op!(Div, div, BinaryOp::Divide);

/// Complement sugar: `1.0 - expr`.
///
/// # Panics
///
/// Panics unless the left operand is exactly `1.0`; general subtraction
/// of expressions is not a supported operation.
impl std::ops::Sub<Expr> for f64 {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        assert!(
            self == 1.0,
            "only `1.0 - expr` (the complement) is supported, got `{} - expr`",
            self
        );
        rhs.complement()
    }
}

impl std::ops::Sub<&Expr> for f64 {
    type Output = Expr;
    fn sub(self, rhs: &Expr) -> Expr {
        self - rhs.clone()
    }
}

// ========== Broadcast containers ==========

/// A labeled sequence of expressions.
///
/// Constructors share one context across all elements by default; use
/// the `_unsynced` variant when elements must sample independently.
#[derive(Debug, Clone)]
pub struct ExprSeries {
    items: Vec<(String, Expr)>,
}

impl ExprSeries {
    /// Build from distributions, all sampling in one fresh shared
    /// context.
    pub fn from_distributions(
        items: Vec<(String, Rc<dyn RandomVariable>)>,
    ) -> Self {
        let ctx = fresh_context();
        let items = items
            .into_iter()
            .map(|(label, dist)| (label, Expr::sample_in(dist, &ctx)))
            .collect();
        Self { items }
    }

    /// Build from expressions, rebinding them all onto one fresh shared
    /// context.
    pub fn from_exprs(items: Vec<(String, Expr)>) -> Self {
        let mut series = Self { items };
        series.rebind_all(&fresh_context());
        series
    }

    /// Build from expressions keeping each element's own context.
    pub fn from_exprs_unsynced(items: Vec<(String, Expr)>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&Expr> {
        self.items
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Expr)> {
        self.items.iter()
    }

    pub(crate) fn rebind_all(&mut self, ctx: &SharedContext) {
        for (_, expr) in &mut self.items {
            expr.set_context(ctx);
        }
    }

    /// Evaluate every element.
    pub fn outputs(
        &self,
        num_samples: usize,
    ) -> Result<Vec<(String, CalcValue)>, AleatorError> {
        self.items
            .iter()
            .map(|(label, expr)| Ok((label.clone(), expr.output(num_samples)?)))
            .collect()
    }

    /// Fold the elements with `+` into a single expression.
    pub fn sum(&self) -> Result<Expr, AleatorError> {
        let mut iter = self.items.iter();
        let (_, first) = iter.next().ok_or_else(|| {
            AleatorError::invalid_argument("cannot sum an empty series")
        })?;
        let mut total = first.clone();
        for (_, expr) in iter {
            total = &total + expr;
        }
        Ok(total)
    }

    /// Elementwise complement.
    pub fn complement(&self) -> ExprSeries {
        ExprSeries {
            items: self
                .items
                .iter()
                .map(|(label, expr)| (label.clone(), expr.complement()))
                .collect(),
        }
    }

    /// Combine elementwise with a single expression.
    pub fn combine_expr(&self, other: &Expr, op: BinaryOp, series_on_left: bool) -> ExprSeries {
        ExprSeries {
            items: self
                .items
                .iter()
                .map(|(label, expr)| {
                    let combined = if series_on_left {
                        Expr::binary(op, expr, other)
                    } else {
                        Expr::binary(op, other, expr)
                    };
                    (label.clone(), combined)
                })
                .collect(),
        }
    }

    /// Combine elementwise with a scalar.
    pub fn combine_scalar(&self, value: f64, op: BinaryOp, series_on_left: bool) -> ExprSeries {
        ExprSeries {
            items: self
                .items
                .iter()
                .map(|(label, expr)| {
                    let combined = if series_on_left {
                        Expr::binary_scalar_rhs(op, expr, value)
                    } else {
                        Expr::binary_scalar_lhs(op, value, expr)
                    };
                    (label.clone(), combined)
                })
                .collect(),
        }
    }

    /// Combine two series elementwise; the labels must match pairwise.
    pub fn combine(&self, other: &ExprSeries, op: BinaryOp) -> Result<ExprSeries, AleatorError> {
        if self.labels() != other.labels() {
            return Err(AleatorError::invalid_argument(format!(
                "series labels differ: {:?} vs {:?}",
                self.labels(),
                other.labels()
            )));
        }
        let items = self
            .items
            .iter()
            .zip(other.items.iter())
            .map(|((label, a), (_, b))| (label.clone(), Expr::binary(op, a, b)))
            .collect();
        Ok(ExprSeries { items })
    }
}

macro_rules! impl_series_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait<&ExprSeries> for &Expr {
            type Output = ExprSeries;
            fn $method(self, rhs: &ExprSeries) -> ExprSeries {
                rhs.combine_expr(self, $op, false)
            }
        }

        impl std::ops::$trait<&Expr> for &ExprSeries {
            type Output = ExprSeries;
            fn $method(self, rhs: &Expr) -> ExprSeries {
                self.combine_expr(rhs, $op, true)
            }
        }

        impl std::ops::$trait<f64> for &ExprSeries {
            type Output = ExprSeries;
            fn $method(self, rhs: f64) -> ExprSeries {
                self.combine_scalar(rhs, $op, true)
            }
        }

        impl std::ops::$trait<&ExprSeries> for f64 {
            type Output = ExprSeries;
            fn $method(self, rhs: &ExprSeries) -> ExprSeries {
                rhs.combine_scalar(self, $op, false)
            }
        }
    };
}

impl_series_binary_op!(Mul, mul, BinaryOp::Multiply);
impl_series_binary_op!(Add, add, BinaryOp::Add);
impl_series_binary_op!(Div, div, BinaryOp::Divide);

/// A labeled table of expressions, one [`ExprSeries`] per column.
///
/// Construction shares one context across every cell by default.
#[derive(Debug, Clone)]
pub struct ExprFrame {
    columns: Vec<(String, ExprSeries)>,
}

impl ExprFrame {
    /// Build from columns, rebinding every cell onto one fresh shared
    /// context.
    pub fn from_columns(columns: Vec<(String, ExprSeries)>) -> Self {
        let mut frame = Self { columns };
        frame.rebind_all(&fresh_context());
        frame
    }

    /// Build from columns keeping each cell's own context.
    pub fn from_columns_unsynced(columns: Vec<(String, ExprSeries)>) -> Self {
        Self { columns }
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_labels(&self) -> Vec<&str> {
        self.columns.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn column(&self, label: &str) -> Option<&ExprSeries> {
        self.columns
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, s)| s)
    }

    pub(crate) fn rebind_all(&mut self, ctx: &SharedContext) {
        for (_, column) in &mut self.columns {
            column.rebind_all(ctx);
        }
    }

    /// Combine every cell with a single expression.
    pub fn combine_expr(&self, other: &Expr, op: BinaryOp, frame_on_left: bool) -> ExprFrame {
        ExprFrame {
            columns: self
                .columns
                .iter()
                .map(|(label, column)| {
                    (label.clone(), column.combine_expr(other, op, frame_on_left))
                })
                .collect(),
        }
    }

    /// Combine every cell with a scalar.
    pub fn combine_scalar(&self, value: f64, op: BinaryOp, frame_on_left: bool) -> ExprFrame {
        ExprFrame {
            columns: self
                .columns
                .iter()
                .map(|(label, column)| {
                    (label.clone(), column.combine_scalar(value, op, frame_on_left))
                })
                .collect(),
        }
    }

    /// Evaluate every cell, column by column.
    pub fn outputs(
        &self,
        num_samples: usize,
    ) -> Result<Vec<(String, Vec<(String, CalcValue)>)>, AleatorError> {
        self.columns
            .iter()
            .map(|(label, column)| Ok((label.clone(), column.outputs(num_samples)?)))
            .collect()
    }
}

macro_rules! impl_frame_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait<&ExprFrame> for &Expr {
            type Output = ExprFrame;
            fn $method(self, rhs: &ExprFrame) -> ExprFrame {
                rhs.combine_expr(self, $op, false)
            }
        }

        impl std::ops::$trait<&Expr> for &ExprFrame {
            type Output = ExprFrame;
            fn $method(self, rhs: &Expr) -> ExprFrame {
                self.combine_expr(rhs, $op, true)
            }
        }

        impl std::ops::$trait<f64> for &ExprFrame {
            type Output = ExprFrame;
            fn $method(self, rhs: f64) -> ExprFrame {
                self.combine_scalar(rhs, $op, true)
            }
        }

        impl std::ops::$trait<&ExprFrame> for f64 {
            type Output = ExprFrame;
            fn $method(self, rhs: &ExprFrame) -> ExprFrame {
                rhs.combine_scalar(self, $op, false)
            }
        }
    };
}

impl_frame_binary_op!(Mul, mul, BinaryOp::Multiply);
impl_frame_binary_op!(Add, add, BinaryOp::Add);
impl_frame_binary_op!(Div, div, BinaryOp::Divide);
