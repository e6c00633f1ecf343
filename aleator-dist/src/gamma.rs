//! Gamma distribution (shape / rate parameterization)

use crate::{DistributionError, RandomVariable};
use aleator_core::Samples;
use rand::RngCore;
use rand_distr::Distribution;
use std::fmt;

/// Gamma-distributed positive quantity with shape `α` and rate `β`.
#[derive(Debug, Clone)]
pub struct Gamma {
    alpha: f64,
    beta: f64,
    inner: rand_distr::Gamma<f64>,
}

impl Gamma {
    pub fn new(alpha: f64, beta: f64) -> Result<Self, DistributionError> {
        if !(alpha > 0.0) || !(beta > 0.0) {
            return Err(DistributionError::invalid(format!(
                "Gamma requires α > 0 and β > 0, got α={}, β={}",
                alpha, beta
            )));
        }
        // rand_distr uses shape/scale; scale is the inverse rate
        let inner = rand_distr::Gamma::new(alpha, 1.0 / beta)
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
        self.alpha / self.beta
    }
}

impl fmt::Display for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gamma(α={}, β={})", self.alpha, self.beta)
    }
}

impl RandomVariable for Gamma {
    fn sample(&self, num_samples: usize, rng: &mut dyn RngCore) -> Samples {
        let values = (0..num_samples).map(|_| self.inner.sample(rng)).collect();
        Samples::new(self.to_string(), values)
    }
}
