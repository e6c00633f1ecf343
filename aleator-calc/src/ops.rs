//! Operator strategies
//!
//! Stateless operator enums the calculation nodes delegate to. Each
//! operator produces both the combined numeric value and the combined
//! label; labels feed the memoization keys one level up, so every branch
//! relabels its result.
//!
//! Binary operators dispatch on the runtime shape of each side -
//! {Scalar, Samples, Frame} squared - in one routine parameterized by the
//! scalar function. Unsupported pairings fail with a type error naming
//! the accepted shapes; nothing is coerced.

use aleator_core::{AleatorError, CalcValue, Samples};

/// Wrap `label` in parentheses when it names a composite calculation.
fn bracket(label: &str, composite: bool) -> String {
    if composite {
        format!("({})", label)
    } else {
        label.to_string()
    }
}

fn scalar_label(v: f64) -> String {
    format!("{}", v)
}

// ========== Binary operators ==========

/// A binary numeric operator combining two calculation values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }

    fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Multiply => a * b,
            // IEEE division; 0/0 passes through as NaN
            BinaryOp::Divide => a / b,
        }
    }

    /// Textual combination of two operand names.
    pub fn get_name(&self, name_1: &str, name_2: &str) -> String {
        format!("{} {} {}", name_1, self.symbol(), name_2)
    }

    /// Combine two values, relabeling the result.
    ///
    /// The `*_calc` flags mark operands that are themselves composite
    /// calculations and only control label bracketing.
    pub fn operate(
        &self,
        value_1: &CalcValue,
        value_2: &CalcValue,
        value_1_calc: bool,
        value_2_calc: bool,
    ) -> Result<CalcValue, AleatorError> {
        use CalcValue::{Frame, Samples as Seq, Scalar};

        let name =
            |label_1: &str, label_2: &str| self.get_name(&bracket(label_1, value_1_calc), &bracket(label_2, value_2_calc));

        match (value_1, value_2) {
            (Scalar(a), Scalar(b)) => Ok(CalcValue::Scalar(self.apply(*a, *b))),

            (Scalar(a), Seq(s)) => {
                let result = s.map(name(&scalar_label(*a), s.name()), |v| self.apply(*a, v));
                Ok(result.into())
            }
            (Seq(s), Scalar(b)) => {
                let result = s.map(name(s.name(), &scalar_label(*b)), |v| self.apply(v, *b));
                Ok(result.into())
            }
            (Seq(s1), Seq(s2)) => {
                let result = s1.zip_with(s2, name(s1.name(), s2.name()), |a, b| self.apply(a, b))?;
                Ok(result.into())
            }

            // one side a table: broadcast the other side across every column
            (Scalar(a), Frame(f)) => {
                let result = f.map_columns(|col| {
                    col.map(name(&scalar_label(*a), col.name()), |v| self.apply(*a, v))
                })?;
                Ok(result.into())
            }
            (Frame(f), Scalar(b)) => {
                let result = f.map_columns(|col| {
                    col.map(name(col.name(), &scalar_label(*b)), |v| self.apply(v, *b))
                })?;
                Ok(result.into())
            }
            (Seq(s), Frame(f)) => {
                let result = f.try_map_columns(|col| {
                    s.zip_with(col, name(s.name(), col.name()), |a, b| self.apply(a, b))
                })?;
                Ok(result.into())
            }
            (Frame(f), Seq(s)) => {
                let result = f.try_map_columns(|col| {
                    col.zip_with(s, name(col.name(), s.name()), |a, b| self.apply(a, b))
                })?;
                Ok(result.into())
            }

            // two tables: columns zipped positionally
            (Frame(f1), Frame(f2)) => {
                if f1.num_columns() != f2.num_columns() {
                    return Err(AleatorError::ColumnMismatch {
                        left: f1.num_columns(),
                        right: f2.num_columns(),
                    });
                }
                let columns = f1
                    .columns()
                    .iter()
                    .zip(f2.columns())
                    .map(|(c1, c2)| {
                        c1.zip_with(c2, name(c1.name(), c2.name()), |a, b| self.apply(a, b))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(aleator_core::SampleFrame::new(columns)?.into())
            }
        }
    }
}

// ========== Unary operators ==========

/// A unary operator over a single calculation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// The probability complement `1 - p`.
    Complement,
}

impl UnaryOp {
    pub fn get_name(&self, name: &str) -> String {
        match self {
            UnaryOp::Complement => format!("1 - {}", name),
        }
    }

    pub fn operate(&self, value: &CalcValue) -> Result<CalcValue, AleatorError> {
        match value {
            CalcValue::Scalar(v) => Ok(CalcValue::Scalar(1.0 - v)),
            CalcValue::Samples(s) => {
                Ok(s.map(self.get_name(s.name()), |v| 1.0 - v).into())
            }
            CalcValue::Frame(f) => {
                let result =
                    f.map_columns(|col| col.map(self.get_name(col.name()), |v| 1.0 - v))?;
                Ok(result.into())
            }
        }
    }
}

// ========== Aggregators ==========

/// An operator reducing a table to a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    /// Row-wise sum across all columns.
    Sum,
}

impl AggregateOp {
    pub fn get_name(&self, name: &str) -> String {
        match self {
            AggregateOp::Sum => format!("sum({})", name),
        }
    }

    pub fn operate(&self, value: &CalcValue) -> Result<CalcValue, AleatorError> {
        match value {
            CalcValue::Frame(f) => {
                let names_csv = f.column_names().join(", ");
                Ok(f.sum_rows(format!("sum({})", names_csv)).into())
            }
            other => Err(AleatorError::type_mismatch("Frame", other.kind_name())),
        }
    }
}

// ========== Array operators ==========

/// An n-ary operator reducing parallel inputs elementwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOp {
    Min,
    Max,
    Mean,
    Median,
}

impl ArrayOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArrayOp::Min => "min",
            ArrayOp::Max => "max",
            ArrayOp::Mean => "mean",
            ArrayOp::Median => "median",
        }
    }

    pub fn get_name(&self, names: &[String]) -> String {
        format!("{}({})", self.symbol(), names.join(", "))
    }

    fn reduce(&self, values: &mut Vec<f64>) -> f64 {
        match self {
            ArrayOp::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            ArrayOp::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ArrayOp::Mean => values.iter().sum::<f64>() / values.len() as f64,
            ArrayOp::Median => {
                values.sort_by(|a, b| a.total_cmp(b));
                let mid = values.len() / 2;
                if values.len() % 2 == 1 {
                    values[mid]
                } else {
                    (values[mid - 1] + values[mid]) / 2.0
                }
            }
        }
    }

    /// Reduce the inputs, which must be all scalars or all equal-length
    /// sequences.
    pub fn operate(&self, values: &[CalcValue]) -> Result<CalcValue, AleatorError> {
        if values.is_empty() {
            return Err(AleatorError::invalid_argument(
                "array operator requires at least one input",
            ));
        }
        if values.iter().all(|v| matches!(v, CalcValue::Scalar(_))) {
            let mut scalars: Vec<f64> = values.iter().filter_map(|v| v.as_scalar()).collect();
            return Ok(CalcValue::Scalar(self.reduce(&mut scalars)));
        }
        if values.iter().all(|v| matches!(v, CalcValue::Samples(_))) {
            let sequences: Vec<&Samples> =
                values.iter().filter_map(|v| v.as_samples()).collect();
            let len = sequences[0].len();
            for s in &sequences[1..] {
                if s.len() != len {
                    return Err(AleatorError::LengthMismatch {
                        left: len,
                        right: s.len(),
                    });
                }
            }
            let labels: Vec<String> = sequences.iter().map(|s| s.name().to_string()).collect();
            let reduced = (0..len)
                .map(|i| {
                    let mut row: Vec<f64> = sequences.iter().map(|s| s.values()[i]).collect();
                    self.reduce(&mut row)
                })
                .collect();
            return Ok(Samples::new(self.get_name(&labels), reduced).into());
        }
        let kinds = values
            .iter()
            .map(CalcValue::kind_name)
            .collect::<Vec<_>>()
            .join(", ");
        Err(AleatorError::type_mismatch(
            "all Scalar or all Samples",
            kinds,
        ))
    }
}
