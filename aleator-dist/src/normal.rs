//! Normal distribution

use crate::{DistributionError, RandomVariable};
use aleator_core::Samples;
use rand::RngCore;
use rand_distr::Distribution;
use std::fmt;

/// Normally-distributed quantity with mean `μ` and standard deviation `σ`.
#[derive(Debug, Clone)]
pub struct Normal {
    mu: f64,
    sigma: f64,
    inner: rand_distr::Normal<f64>,
}

impl Normal {
    pub fn new(mu: f64, sigma: f64) -> Result<Self, DistributionError> {
        if !(sigma > 0.0) {
            return Err(DistributionError::invalid(format!(
                "Normal requires σ > 0, got σ={}",
                sigma
            )));
        }
        let inner = rand_distr::Normal::new(mu, sigma)
            .map_err(|e| DistributionError::invalid(e.to_string()))?;
        Ok(Self { mu, sigma, inner })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl fmt::Display for Normal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Normal(μ={}, σ={})", self.mu, self.sigma)
    }
}

impl RandomVariable for Normal {
    fn sample(&self, num_samples: usize, rng: &mut dyn RngCore) -> Samples {
        let values = (0..num_samples).map(|_| self.inner.sample(rng)).collect();
        Samples::new(self.to_string(), values)
    }
}
