//! Random-variable capability traits
//!
//! The calculation graph consumes distributions through these two traits
//! only: a distribution can produce N draws, and it renders a stable
//! display name. The name is used as a memoization key, so it must depend
//! only on construction parameters.

use aleator_core::{SampleFrame, Samples};
use rand::RngCore;
use std::fmt;

/// A univariate random variable: N draws as a labeled sequence.
pub trait RandomVariable: fmt::Display {
    /// Draw `num_samples` i.i.d. values, labeled with the display name.
    fn sample(&self, num_samples: usize, rng: &mut dyn RngCore) -> Samples;
}

/// A multivariate random variable: N draws as a labeled table,
/// one column per component, named `"{self}[{component}]"`.
pub trait RandomVector: fmt::Display {
    fn sample_vector(&self, num_samples: usize, rng: &mut dyn RngCore) -> SampleFrame;
}
