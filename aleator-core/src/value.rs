//! Runtime values flowing through a calculation
//!
//! The closed set of shapes an operator can produce or consume: a bare
//! scalar, a labeled sequence of draws, or a labeled table of draws.
//! Conversion happens once at the boundary; operators dispatch on the
//! variant instead of inspecting concrete container types.

use crate::{SampleFrame, Samples};
use serde::{Deserialize, Serialize};

/// A value produced by evaluating a calculation node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalcValue {
    Scalar(f64),
    Samples(Samples),
    Frame(SampleFrame),
}

impl CalcValue {
    // ========== Safe accessors ==========

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            CalcValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_samples(&self) -> Option<&Samples> {
        match self {
            CalcValue::Samples(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&SampleFrame> {
        match self {
            CalcValue::Frame(f) => Some(f),
            _ => None,
        }
    }

    /// Shape name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CalcValue::Scalar(_) => "Scalar",
            CalcValue::Samples(_) => "Samples",
            CalcValue::Frame(_) => "Frame",
        }
    }
}

impl From<f64> for CalcValue {
    fn from(v: f64) -> Self {
        CalcValue::Scalar(v)
    }
}

impl From<Samples> for CalcValue {
    fn from(s: Samples) -> Self {
        CalcValue::Samples(s)
    }
}

impl From<SampleFrame> for CalcValue {
    fn from(f: SampleFrame) -> Self {
        CalcValue::Frame(f)
    }
}
