//! Dirichlet distribution over labeled components

use crate::{DistributionError, RandomVector};
use aleator_core::{SampleFrame, Samples};
use rand::RngCore;
use rand_distr::Distribution;
use std::fmt;

/// Dirichlet-distributed probability vector.
///
/// Components are labeled; the unlabeled constructor auto-labels them
/// `α1..αk`. Each draw is a vector summing to 1, returned as one frame
/// column per component.
#[derive(Debug, Clone)]
pub struct Dirichlet {
    alpha: Vec<(String, f64)>,
    inner: rand_distr::Dirichlet<f64>,
}

impl Dirichlet {
    /// Build from concentration values, auto-labeling components `α1..αk`.
    pub fn new(alpha: Vec<f64>) -> Result<Self, DistributionError> {
        let labeled = alpha
            .into_iter()
            .enumerate()
            .map(|(k, v)| (format!("α{}", k + 1), v))
            .collect();
        Self::with_labels(labeled)
    }

    /// Build from labeled concentration values.
    pub fn with_labels(alpha: Vec<(String, f64)>) -> Result<Self, DistributionError> {
        if alpha.len() < 2 {
            return Err(DistributionError::invalid(
                "Dirichlet requires at least 2 components",
            ));
        }
        if alpha.iter().any(|(_, v)| !(*v > 0.0)) {
            return Err(DistributionError::invalid(
                "Dirichlet requires every α > 0",
            ));
        }
        let concentrations: Vec<f64> = alpha.iter().map(|(_, v)| *v).collect();
        let inner = rand_distr::Dirichlet::new(&concentrations)
            .map_err(|e| DistributionError::invalid(e.to_string()))?;
        Ok(Self { alpha, inner })
    }

    pub fn alpha(&self) -> &[(String, f64)] {
        &self.alpha
    }

    pub fn labels(&self) -> Vec<&str> {
        self.alpha.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn num_components(&self) -> usize {
        self.alpha.len()
    }
}

impl fmt::Display for Dirichlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .alpha
            .iter()
            .map(|(l, v)| format!("{}={}", l, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Dirichlet({})", params)
    }
}

impl RandomVector for Dirichlet {
    fn sample_vector(&self, num_samples: usize, rng: &mut dyn RngCore) -> SampleFrame {
        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(num_samples); self.alpha.len()];
        for _ in 0..num_samples {
            let draw = self.inner.sample(rng);
            for (column, value) in columns.iter_mut().zip(draw) {
                column.push(value);
            }
        }
        let name = self.to_string();
        let columns = self
            .alpha
            .iter()
            .zip(columns)
            .map(|((label, _), values)| Samples::new(format!("{}[{}]", name, label), values))
            .collect();
        // columns are equal-length by construction
        SampleFrame::new(columns).expect("component columns share one length")
    }
}
