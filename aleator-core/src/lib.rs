//! Aleator Core - Fundamental types
//!
//! This crate provides the core types used throughout Aleator:
//! - `Samples`: a labeled 1-D sequence of numeric draws
//! - `SampleFrame`: a labeled 2-D table of draws (equal-length columns)
//! - `CalcValue`: the closed sum of value shapes operators work over
//! - `AleatorError`: shared error type for values and operators

mod error;
mod frame;
mod samples;
mod value;

pub use error::AleatorError;
pub use frame::SampleFrame;
pub use samples::Samples;
pub use value::CalcValue;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{AleatorError, CalcValue, SampleFrame, Samples};
}

#[cfg(test)]
mod tests {
    use super::*;

    mod samples_tests {
        use super::*;

        #[test]
        fn test_map_relabels() {
            let s = Samples::new("X", vec![1.0, 2.0, 3.0]);
            let doubled = s.map("2 * X", |v| 2.0 * v);
            assert_eq!(doubled.name(), "2 * X");
            assert_eq!(doubled.values(), &[2.0, 4.0, 6.0]);
        }

        #[test]
        fn test_zip_with() {
            let a = Samples::new("A", vec![1.0, 2.0]);
            let b = Samples::new("B", vec![10.0, 20.0]);
            let sum = a.zip_with(&b, "A + B", |x, y| x + y).unwrap();
            assert_eq!(sum.name(), "A + B");
            assert_eq!(sum.values(), &[11.0, 22.0]);
        }

        #[test]
        fn test_zip_with_length_mismatch() {
            let a = Samples::new("A", vec![1.0, 2.0]);
            let b = Samples::new("B", vec![10.0]);
            let err = a.zip_with(&b, "A + B", |x, y| x + y).unwrap_err();
            assert!(matches!(err, AleatorError::LengthMismatch { left: 2, right: 1 }));
        }

        #[test]
        fn test_mean_and_std() {
            let s = Samples::new("X", vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
            assert!((s.mean() - 5.0).abs() < 1e-12);
            // sample std with n-1 denominator
            assert!((s.std() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        }

        #[test]
        fn test_approx_eq_ignores_labels() {
            let a = Samples::new("A", vec![0.5, 0.25]);
            let b = Samples::new("B", vec![0.5, 0.25]);
            assert!(a.approx_eq(&b, 1e-12));
        }
    }

    mod frame_tests {
        use super::*;

        fn frame() -> SampleFrame {
            SampleFrame::new(vec![
                Samples::new("c1", vec![1.0, 2.0]),
                Samples::new("c2", vec![10.0, 20.0]),
            ])
            .unwrap()
        }

        #[test]
        fn test_ragged_columns_rejected() {
            let err = SampleFrame::new(vec![
                Samples::new("c1", vec![1.0, 2.0]),
                Samples::new("c2", vec![1.0]),
            ])
            .unwrap_err();
            assert!(matches!(err, AleatorError::LengthMismatch { .. }));
        }

        #[test]
        fn test_column_lookup() {
            let f = frame();
            assert_eq!(f.column("c2").unwrap().values(), &[10.0, 20.0]);
            assert!(f.column("missing").is_none());
            assert_eq!(f.column_names(), vec!["c1", "c2"]);
        }

        #[test]
        fn test_sum_rows() {
            let total = frame().sum_rows("sum(c1, c2)");
            assert_eq!(total.name(), "sum(c1, c2)");
            assert_eq!(total.values(), &[11.0, 22.0]);
        }

        #[test]
        fn test_empty_frame() {
            let f = SampleFrame::new(vec![]).unwrap();
            assert_eq!(f.num_rows(), 0);
            assert_eq!(f.num_columns(), 0);
        }
    }

    mod value_tests {
        use super::*;

        #[test]
        fn test_from_impls() {
            let v: CalcValue = 0.5.into();
            assert_eq!(v.as_scalar(), Some(0.5));
            let v: CalcValue = Samples::new("X", vec![1.0]).into();
            assert_eq!(v.kind_name(), "Samples");
            assert!(v.as_frame().is_none());
        }

        #[test]
        fn test_kind_names() {
            assert_eq!(CalcValue::Scalar(1.0).kind_name(), "Scalar");
            let f = SampleFrame::new(vec![]).unwrap();
            assert_eq!(CalcValue::Frame(f).kind_name(), "Frame");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_type_mismatch_display() {
            let err = AleatorError::type_mismatch("Frame", "Scalar");
            assert_eq!(
                err.to_string(),
                "type mismatch: expected Frame, got Scalar"
            );
        }

        #[test]
        fn test_name_not_found_display() {
            let err = AleatorError::NameNotFound("0.5 * X".to_string());
            assert!(err.to_string().contains("0.5 * X"));
        }
    }
}
