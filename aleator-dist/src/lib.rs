//! Aleator Dist - Sampling distributions
//!
//! The random-variable capability traits consumed by the calculation
//! graph, and concrete distributions wrapping `rand_distr` samplers:
//! Beta, Gamma, Normal, ContinuousUniform (univariate) and Dirichlet
//! (multivariate). A distribution's `Display` string is its stable
//! identity; it depends only on construction parameters.

mod beta;
mod dirichlet;
mod error;
mod gamma;
mod normal;
mod traits;
mod uniform;

pub use beta::Beta;
pub use dirichlet::Dirichlet;
pub use error::DistributionError;
pub use gamma::Gamma;
pub use normal::Normal;
pub use traits::{RandomVariable, RandomVector};
pub use uniform::ContinuousUniform;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Beta, ContinuousUniform, Dirichlet, DistributionError, Gamma, Normal, RandomVariable,
        RandomVector,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(0xa1ea70)
    }

    mod beta_tests {
        use super::*;

        #[test]
        fn test_display_is_stable() {
            let b = Beta::new(700.0, 300.0).unwrap();
            assert_eq!(b.to_string(), "Beta(α=700, β=300)");
        }

        #[test]
        fn test_invalid_parameters() {
            assert!(Beta::new(0.0, 1.0).is_err());
            assert!(Beta::new(1.0, -2.0).is_err());
        }

        #[test]
        fn test_sample_count_and_label() {
            let b = Beta::new(700.0, 300.0).unwrap();
            let s = b.sample(500, &mut rng());
            assert_eq!(s.len(), 500);
            assert_eq!(s.name(), "Beta(α=700, β=300)");
            assert!(s.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
        }

        #[test]
        fn test_sample_mean_near_expectation() {
            let b = Beta::new(700.0, 300.0).unwrap();
            let s = b.sample(20_000, &mut rng());
            assert!((s.mean() - b.mean()).abs() < 0.01);
        }
    }

    mod gamma_tests {
        use super::*;

        #[test]
        fn test_display_uses_rate() {
            let g = Gamma::new(3.0, 2.0).unwrap();
            assert_eq!(g.to_string(), "Gamma(α=3, β=2)");
        }

        #[test]
        fn test_sample_mean_near_shape_over_rate() {
            let g = Gamma::new(3.0, 2.0).unwrap();
            let s = g.sample(20_000, &mut rng());
            assert!((s.mean() - 1.5).abs() < 0.05);
        }
    }

    mod normal_tests {
        use super::*;

        #[test]
        fn test_invalid_sigma() {
            assert!(Normal::new(0.0, 0.0).is_err());
        }

        #[test]
        fn test_sample_moments() {
            let n = Normal::new(5.0, 2.0).unwrap();
            let s = n.sample(20_000, &mut rng());
            assert!((s.mean() - 5.0).abs() < 0.05);
            assert!((s.std() - 2.0).abs() < 0.05);
        }
    }

    mod uniform_tests {
        use super::*;

        #[test]
        fn test_bounds() {
            let u = ContinuousUniform::new(2.0, 4.0).unwrap();
            let s = u.sample(1_000, &mut rng());
            assert!(s.values().iter().all(|&v| (2.0..4.0).contains(&v)));
        }

        #[test]
        fn test_degenerate_interval_rejected() {
            assert!(ContinuousUniform::new(1.0, 1.0).is_err());
        }
    }

    mod dirichlet_tests {
        use super::*;

        #[test]
        fn test_auto_labels_and_display() {
            let d = Dirichlet::new(vec![500.0, 300.0, 200.0]).unwrap();
            assert_eq!(d.to_string(), "Dirichlet(α1=500, α2=300, α3=200)");
            assert_eq!(d.labels(), vec!["α1", "α2", "α3"]);
        }

        #[test]
        fn test_custom_labels() {
            let d = Dirichlet::with_labels(vec![
                ("x".to_string(), 100.0),
                ("y".to_string(), 200.0),
                ("z".to_string(), 300.0),
            ])
            .unwrap();
            assert_eq!(d.to_string(), "Dirichlet(x=100, y=200, z=300)");
        }

        #[test]
        fn test_draws_sum_to_one() {
            let d = Dirichlet::new(vec![5.0, 3.0, 2.0]).unwrap();
            let frame = d.sample_vector(100, &mut rng());
            assert_eq!(frame.num_columns(), 3);
            assert_eq!(frame.num_rows(), 100);
            let totals = frame.sum_rows("total");
            assert!(totals.values().iter().all(|&v| (v - 1.0).abs() < 1e-9));
        }

        #[test]
        fn test_column_names_carry_component() {
            let d = Dirichlet::new(vec![5.0, 3.0]).unwrap();
            let frame = d.sample_vector(10, &mut rng());
            assert_eq!(
                frame.column_names(),
                vec!["Dirichlet(α1=5, α2=3)[α1]", "Dirichlet(α1=5, α2=3)[α2]"]
            );
        }

        #[test]
        fn test_too_few_components() {
            assert!(Dirichlet::new(vec![1.0]).is_err());
        }
    }
}
