//! Continuous uniform distribution

use crate::{DistributionError, RandomVariable};
use aleator_core::Samples;
use rand::RngCore;
use rand_distr::{Distribution, Uniform};
use std::fmt;

/// Uniformly-distributed quantity on `[a, b)`.
#[derive(Debug, Clone)]
pub struct ContinuousUniform {
    a: f64,
    b: f64,
    inner: Uniform<f64>,
}

impl ContinuousUniform {
    pub fn new(a: f64, b: f64) -> Result<Self, DistributionError> {
        if !(b > a) {
            return Err(DistributionError::invalid(format!(
                "ContinuousUniform requires b > a, got a={}, b={}",
                a, b
            )));
        }
        Ok(Self {
            a,
            b,
            inner: Uniform::new(a, b),
        })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}

impl fmt::Display for ContinuousUniform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContinuousUniform(a={}, b={})", self.a, self.b)
    }
}

impl RandomVariable for ContinuousUniform {
    fn sample(&self, num_samples: usize, rng: &mut dyn RngCore) -> Samples {
        let values = (0..num_samples).map(|_| self.inner.sample(rng)).collect();
        Samples::new(self.to_string(), values)
    }
}
