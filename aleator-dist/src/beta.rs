//! Beta distribution

use crate::{DistributionError, RandomVariable};
use aleator_core::Samples;
use rand::RngCore;
use rand_distr::Distribution;
use std::fmt;

/// Beta-distributed probability on `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Beta {
    alpha: f64,
    beta: f64,
    inner: rand_distr::Beta<f64>,
}

impl Beta {
    pub fn new(alpha: f64, beta: f64) -> Result<Self, DistributionError> {
        if !(alpha > 0.0) || !(beta > 0.0) {
            return Err(DistributionError::invalid(format!(
                "Beta requires α > 0 and β > 0, got α={}, β={}",
                alpha, beta
            )));
        }
        let inner = rand_distr::Beta::new(alpha, beta)
            .map_err(|e| DistributionError::invalid(e.to_string()))?;
        Ok(Self { alpha, beta, inner })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }
}

impl fmt::Display for Beta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Beta(α={}, β={})", self.alpha, self.beta)
    }
}

impl RandomVariable for Beta {
    fn sample(&self, num_samples: usize, rng: &mut dyn RngCore) -> Samples {
        let values = (0..num_samples).map(|_| self.inner.sample(rng)).collect();
        Samples::new(self.to_string(), values)
    }
}
