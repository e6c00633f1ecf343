//! Aleator Discrete - Joint and conditional probability table algebra
//!
//! Labeled probability tables over categorical variables, with the
//! transforms the laws of probability call for: marginalization,
//! conditioning over every combination at once, conditioning on fixed or
//! filtered values, and chain-rule multiplication/division with index
//! alignment. Every transform produces a new table.

mod conditional;
mod discrete;
mod error;
mod filter;
mod state;
mod table;

pub use conditional::{Conditional, GivenResult};
pub use discrete::Discrete;
pub use error::DiscreteError;
pub use filter::{valid_name_comparator, Comparator, Filter, FilterValue};
pub use state::{states, IntoStateKey, State};
pub use table::ProbTable;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        states, valid_name_comparator, Comparator, Conditional, Discrete, DiscreteError, Filter,
        FilterValue, GivenResult, ProbTable, State,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The classic two-box fruit example: 8 fruits in the red box
    /// (1 apple, 7 oranges), 4 apples in the blue box.
    fn fruit_box() -> Discrete {
        let boxes = states(std::iter::repeat("red").take(8).chain(std::iter::repeat("blue").take(4)));
        let fruit = states(
            std::iter::once("apple")
                .chain(std::iter::repeat("orange").take(7))
                .chain(std::iter::repeat("apple").take(4)),
        );
        Discrete::from_observations(vec![("box", boxes), ("fruit", fruit)]).unwrap()
    }

    mod discrete_tests {
        use super::*;

        #[test]
        fn test_from_observations_counts() {
            let p_bf = fruit_box();
            assert_eq!(p_bf.variables(), &["box".to_string(), "fruit".to_string()]);
            assert_eq!(p_bf.to_string(), "p(box,fruit)");
            assert!((p_bf.p(&[Filter::eq("box", "red"), Filter::eq("fruit", "orange")]).unwrap()
                - 7.0 / 12.0)
                .abs()
                < 1e-12);
        }

        #[test]
        fn test_box_marginal_is_exact() {
            let p_b = fruit_box().marginal(&["box"]).unwrap();
            assert_eq!(p_b.p(&[Filter::eq("box", "blue")]).unwrap(), 1.0 / 3.0);
            assert!((p_b.p(&[Filter::eq("box", "red")]).unwrap() - 2.0 / 3.0).abs() < 1e-15);
        }

        #[test]
        fn test_orange_given_red_box() {
            let p_f__red = fruit_box().given(&[Filter::eq("box", "red")]).unwrap();
            assert_eq!(p_f__red.variables(), &["fruit".to_string()]);
            assert!(
                (p_f__red.p(&[Filter::eq("fruit", "orange")]).unwrap() - 7.0 / 8.0).abs() < 1e-15
            );
        }

        #[test]
        fn test_blue_box_given_orange_is_zero() {
            let p_b__orange = fruit_box().given(&[Filter::eq("fruit", "orange")]).unwrap();
            assert_eq!(p_b__orange.p(&[Filter::eq("box", "blue")]).unwrap(), 0.0);
            assert_eq!(p_b__orange.p(&[Filter::eq("box", "red")]).unwrap(), 1.0);
        }

        #[test]
        fn test_chain_rule_restores_joint() {
            let p_bf = fruit_box();
            let p_f__b = p_bf.conditional(&["box"]).unwrap();
            assert_eq!(p_f__b.to_string(), "p(fruit|box)");
            let p_b = p_bf.marginal(&["box"]).unwrap();
            let restored = &p_f__b * &p_b;
            assert!(restored.equivalent(&p_bf, 1e-12));
        }

        #[test]
        fn test_division_matches_conditioning() {
            let p_bf = fruit_box();
            let p_b = p_bf.marginal(&["box"]).unwrap();
            let quotient = &p_bf / &p_b;
            // P(box,fruit)/P(box) carries the conditional values
            assert!(
                (quotient
                    .data()
                    .get(&["red".into(), "orange".into()])
                    .unwrap()
                    - 7.0 / 8.0)
                    .abs()
                    < 1e-15
            );
        }

        #[test]
        fn test_independent_product() {
            let coin = Discrete::binary(0.5, "coin").unwrap();
            let die = Discrete::from_probs(
                (1i64..=6).map(|v| (v, 1.0 / 6.0)),
                &["die"],
            )
            .unwrap();
            let both = &coin * &die;
            assert_eq!(both.variables(), &["coin".to_string(), "die".to_string()]);
            assert!(
                (both.p(&[Filter::eq("coin", 1), Filter::eq("die", 3)]).unwrap() - 1.0 / 12.0)
                    .abs()
                    < 1e-12
            );
        }

        #[test]
        fn test_darts_not_twenty() {
            let p_region = Discrete::from_probs(
                (1i64..=20).map(|r| (r, 1.0 / 20.0)),
                &["region"],
            )
            .unwrap();
            let not_twenty = p_region.given(&[Filter::ne("region", 20)]).unwrap();
            // the region variable survives an inequality filter
            assert_eq!(not_twenty.variables(), &["region".to_string()]);
            for r in 1i64..=19 {
                assert!(
                    (not_twenty.p(&[Filter::eq("region", r)]).unwrap() - 1.0 / 19.0).abs()
                        < 1e-12
                );
            }
            assert_eq!(not_twenty.p(&[Filter::eq("region", 20)]).unwrap(), 0.0);
        }

        #[test]
        fn test_sequential_given_commutes() {
            let table = Discrete::from_probs(
                vec![
                    ((0i64, 0i64, 0i64), 0.05),
                    ((0i64, 0i64, 1i64), 0.10),
                    ((0i64, 1i64, 0i64), 0.15),
                    ((0i64, 1i64, 1i64), 0.20),
                    ((1i64, 0i64, 0i64), 0.08),
                    ((1i64, 0i64, 1i64), 0.12),
                    ((1i64, 1i64, 0i64), 0.13),
                    ((1i64, 1i64, 1i64), 0.17),
                ],
                &["a", "b", "c"],
            )
            .unwrap();
            let ab = table
                .given(&[Filter::eq("a", 1)])
                .unwrap()
                .given(&[Filter::eq("b", 0)])
                .unwrap();
            let ba = table
                .given(&[Filter::eq("b", 0)])
                .unwrap()
                .given(&[Filter::eq("a", 1)])
                .unwrap();
            assert!(ab.equivalent(&ba, 1e-12));
        }

        #[test]
        fn test_unknown_variable_fails() {
            let err = fruit_box().given(&[Filter::eq("basket", "red")]).unwrap_err();
            assert!(matches!(err, DiscreteError::UnknownVariable(_)));
        }

        #[test]
        fn test_zero_mass_given_fails_loudly() {
            let err = fruit_box()
                .given(&[Filter::eq("box", "green")])
                .unwrap_err();
            assert!(matches!(err, DiscreteError::ZeroProbability(_)));
        }
    }

    mod conditional_tests {
        use super::*;

        fn p_fruit_given_box() -> Conditional {
            Conditional::from_probs(
                vec![
                    (("apple", "blue"), 0.75),
                    (("orange", "blue"), 0.25),
                    (("apple", "red"), 0.25),
                    (("orange", "red"), 0.75),
                ],
                &["fruit"],
                &["box"],
            )
            .unwrap()
        }

        #[test]
        fn test_display() {
            assert_eq!(p_fruit_given_box().to_string(), "p(fruit|box)");
        }

        #[test]
        fn test_groups_sum_to_one() {
            let cpt = p_fruit_given_box();
            for state in ["red", "blue"] {
                let total: f64 = ["apple", "orange"]
                    .iter()
                    .map(|fruit| cpt.prob(&[(*fruit).into(), state.into()]).unwrap())
                    .sum();
                assert!((total - 1.0).abs() < 1e-12);
            }
        }

        #[test]
        fn test_given_all_conditions_yields_distribution() {
            let cpt = p_fruit_given_box();
            match cpt.given(&[Filter::eq("box", "red")]).unwrap() {
                GivenResult::Distribution(d) => {
                    assert_eq!(d.variables(), &["fruit".to_string()]);
                    assert_eq!(d.p(&[Filter::eq("fruit", "orange")]).unwrap(), 0.75);
                }
                GivenResult::Table(_) => panic!("expected a distribution"),
            }
        }

        #[test]
        fn test_given_subset_narrows_table() {
            let cpt = Conditional::binary_from_probs(
                vec![((0i64, 0i64), 0.1), ((0i64, 1i64), 0.2), ((1i64, 0i64), 0.7), ((1i64, 1i64), 0.9)],
                "rain",
                &["cloudy", "winter"],
            )
            .unwrap();
            match cpt.given(&[Filter::eq("winter", 1)]).unwrap() {
                GivenResult::Table(narrowed) => {
                    assert_eq!(narrowed.conditional_variables(), &["cloudy".to_string()]);
                    assert_eq!(
                        narrowed.prob(&[1.into(), 0.into()]).unwrap(),
                        0.2
                    );
                }
                GivenResult::Distribution(_) => panic!("expected a table"),
            }
        }

        #[test]
        fn test_chain_rule_multiplication() {
            let cpt = p_fruit_given_box();
            let p_b = Discrete::from_probs(
                vec![("blue", 0.6), ("red", 0.4)],
                &["box"],
            )
            .unwrap();
            let joint = cpt.checked_mul(&p_b).unwrap();
            assert_eq!(joint.to_string(), "p(fruit,box)");
            assert!(
                (joint.p(&[Filter::eq("fruit", "apple"), Filter::eq("box", "blue")]).unwrap()
                    - 0.45)
                    .abs()
                    < 1e-12
            );
            // total probability is preserved
            assert!((joint.data().total() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn test_chain_rule_requires_matching_marginal() {
            let cpt = p_fruit_given_box();
            let wrong = Discrete::binary(0.5, "weather").unwrap();
            assert!(cpt.checked_mul(&wrong).is_err());
        }

        #[test]
        fn test_conditional_product_expands_conditions() {
            // p(a|s) * p(b|t) -> p(a,b|s,t)
            let p_a__s = Conditional::binary_from_probs(
                vec![(0i64, 0.3), (1i64, 0.6)],
                "a",
                &["s"],
            )
            .unwrap();
            let p_b__t = Conditional::binary_from_probs(
                vec![(0i64, 0.2), (1i64, 0.8)],
                "b",
                &["t"],
            )
            .unwrap();
            let product = &p_a__s * &p_b__t;
            assert_eq!(product.joint_variables(), &["a".to_string(), "b".to_string()]);
            assert_eq!(
                product.conditional_variables(),
                &["s".to_string(), "t".to_string()]
            );
            // p(a=1,b=1|s=0,t=1) = 0.3 * 0.8
            assert!(
                (product
                    .prob(&[1.into(), 1.into(), 0.into(), 1.into()])
                    .unwrap()
                    - 0.24)
                    .abs()
                    < 1e-12
            );
            // each conditioning combination still sums to 1
            for s in 0i64..=1 {
                for t in 0i64..=1 {
                    let total: f64 = [(0i64, 0i64), (0, 1), (1, 0), (1, 1)]
                        .iter()
                        .map(|(a, b)| {
                            product
                                .prob(&[(*a).into(), (*b).into(), s.into(), t.into()])
                                .unwrap()
                        })
                        .sum();
                    assert!((total - 1.0).abs() < 1e-12);
                }
            }
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_discrete_round_trips_through_json() {
            let p_bf = fruit_box();
            let json = serde_json::to_string(&p_bf).unwrap();
            let back: Discrete = serde_json::from_str(&json).unwrap();
            assert!(back.equivalent(&p_bf, 0.0));
            assert_eq!(back.states(), p_bf.states());
        }

        #[test]
        fn test_filter_round_trips_through_json() {
            let filter = Filter::is_in("box", ["red", "blue"]);
            let json = serde_json::to_string(&filter).unwrap();
            let back: Filter = serde_json::from_str(&json).unwrap();
            assert_eq!(back, filter);
        }
    }
}
