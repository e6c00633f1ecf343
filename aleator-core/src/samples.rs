//! Labeled 1-D sample sequences
//!
//! A `Samples` is a vector of draws plus the label identifying the
//! expression that produced it. The label doubles as the memoization key
//! in a calculation context, so every transform relabels its result.

use crate::AleatorError;
use serde::{Deserialize, Serialize};

/// A labeled vector of numeric draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    name: String,
    values: Vec<f64>,
}

impl Samples {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the same draws under a new label.
    pub fn renamed(&self, name: impl Into<String>) -> Samples {
        Samples::new(name, self.values.clone())
    }

    /// Apply `f` to every draw, labeling the result `name`.
    pub fn map(&self, name: impl Into<String>, f: impl Fn(f64) -> f64) -> Samples {
        Samples::new(name, self.values.iter().map(|&v| f(v)).collect())
    }

    /// Combine two sequences elementwise, labeling the result `name`.
    ///
    /// Alignment is positional; the lengths must match.
    pub fn zip_with(
        &self,
        other: &Samples,
        name: impl Into<String>,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Samples, AleatorError> {
        if self.len() != other.len() {
            return Err(AleatorError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Samples::new(name, values))
    }

    // ========== Summary statistics ==========

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.sum() / self.values.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std(&self) -> f64 {
        if self.values.len() < 2 {
            return f64::NAN;
        }
        let mean = self.mean();
        let ss: f64 = self.values.iter().map(|&v| (v - mean) * (v - mean)).sum();
        (ss / (self.values.len() - 1) as f64).sqrt()
    }

    /// Elementwise comparison within `tolerance`, ignoring labels.
    pub fn approx_eq(&self, other: &Samples, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(&a, &b)| (a - b).abs() <= tolerance)
    }
}
