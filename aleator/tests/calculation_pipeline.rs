//! End-to-end calculation graph scenarios: shared sampling, context
//! synchronization and Bayes-rule posteriors over real distributions.

use aleator::prelude::*;
use aleator::{Beta, Dirichlet};
use std::rc::Rc;

fn beta(alpha: f64, b: f64) -> Rc<dyn RandomVariable> {
    Rc::new(Beta::new(alpha, b).unwrap())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn posterior_of_beta_prior_and_likelihood_concentrates() {
    init_tracing();
    // prior ≈ 0.7, likelihood ≈ 0.6 -> posterior odds 0.42 : 0.12
    let rule = BinaryBayesRule::new(
        BayesTerm::dist(Beta::new(700.0, 300.0).unwrap()),
        BayesTerm::dist(Beta::new(600.0, 400.0).unwrap()),
    )
    .unwrap();
    let posterior = match rule.posterior().unwrap() {
        Posterior::Calculation(expr) => expr,
        _ => panic!("expected a calculation"),
    };
    let out = posterior.output(50_000).unwrap();
    let samples = out.as_samples().unwrap();
    assert!((samples.mean() - 0.42 / 0.54).abs() < 0.02);
    assert!(samples.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn posterior_name_reflects_the_bayes_expression() {
    let rule = BinaryBayesRule::new(
        0.5.into(),
        BayesTerm::dist(Beta::new(600.0, 400.0).unwrap()),
    )
    .unwrap();
    let posterior = match rule.posterior().unwrap() {
        Posterior::Calculation(expr) => expr,
        _ => panic!("expected a calculation"),
    };
    let name = posterior.name();
    assert!(name.contains("0.5 * Beta(α=600, β=400)"));
    assert!(name.contains("1 - Beta(α=600, β=400)"));
}

#[test]
fn evidence_shares_samples_with_numerator() {
    // the posterior of a certain likelihood given itself is identically
    // the prior weight only when numerator and evidence reuse samples;
    // with independent draws the ratio would scatter
    let ctx = CalculationContext::seeded(17).into_shared();
    let prior = Expr::sample_in(beta(50.0, 50.0), &ctx);
    let numerator = 0.5 * &prior;
    let evidence = &numerator + &(0.5 * &prior.complement());
    let posterior = &numerator / &evidence;
    let out = posterior.output(5_000).unwrap();
    // 0.5p / (0.5p + 0.5(1-p)) = p exactly, sample by sample
    let p = prior.output(5_000).unwrap();
    let posterior_samples = out.as_samples().unwrap();
    let prior_samples = p.as_samples().unwrap();
    assert!(posterior_samples.approx_eq(prior_samples, 1e-10));
}

#[test]
fn sync_context_aligns_separately_built_expressions() {
    let mut first = Expr::sample(beta(700.0, 300.0));
    let mut second = Expr::sample(beta(700.0, 300.0));
    // same distribution, distinct contexts: draws are independent
    assert!(!Rc::ptr_eq(first.context(), second.context()));

    sync_context(&mut [&mut first, &mut second]);
    assert!(Rc::ptr_eq(first.context(), second.context()));
    // one shared context: identical fingerprints now yield identical draws
    let a = first.output(2_000).unwrap();
    let b = second.output(2_000).unwrap();
    assert_eq!(a, b);
}

#[test]
fn dirichlet_posterior_normalizes_rowwise() {
    init_tracing();
    let rule = MultipleBayesRule::from_counts(
        &["spam", "ham"],
        vec![
            ("contains-link".to_string(), vec![120.0, 30.0]),
            ("plain".to_string(), vec![20.0, 230.0]),
        ],
        1.0,
    )
    .unwrap();
    let series = match rule.posterior().unwrap() {
        Posterior::Series(series) => series,
        _ => panic!("expected one posterior per evidence state"),
    };
    assert_eq!(series.labels(), vec!["contains-link", "plain"]);
    for (_, value) in series.outputs(2_000).unwrap() {
        let frame = value.as_frame().unwrap();
        let totals = frame.sum_rows("total");
        assert!(totals.values().iter().all(|&v| (v - 1.0).abs() < 1e-9));
    }
}

#[test]
fn min_of_mixed_inputs_shares_one_context() {
    let ctx = CalculationContext::seeded(3).into_shared();
    let optimistic = Expr::sample_in(beta(900.0, 100.0), &ctx);
    let pessimistic = Expr::sample_in(beta(100.0, 900.0), &ctx);
    let floor = Expr::min_of(vec![
        optimistic.clone().into(),
        pessimistic.clone().into(),
        0.5.into(),
    ])
    .unwrap();
    let out = floor.output(2_000).unwrap();
    let low = pessimistic.output(2_000).unwrap();
    // the pessimistic draws dominate the minimum almost surely
    let floor_samples = out.as_samples().unwrap();
    let low_samples = low.as_samples().unwrap();
    let agreements = floor_samples
        .values()
        .iter()
        .zip(low_samples.values())
        .filter(|(a, b)| (**a - **b).abs() < 1e-12)
        .count();
    assert!(agreements as f64 > 0.99 * floor_samples.len() as f64);
}

#[test]
fn expr_series_broadcast_stays_synced() {
    let prior = Expr::sample(beta(700.0, 300.0));
    let likelihoods = ExprSeries::from_distributions(vec![
        ("$100".to_string(), beta(800.0, 200.0)),
        ("$200".to_string(), beta(600.0, 400.0)),
    ]);
    let weighted = &prior * &likelihoods;
    assert_eq!(weighted.labels(), vec!["$100", "$200"]);
    // broadcasting adopted the prior's context for every element
    for (_, expr) in weighted.iter() {
        assert!(Rc::ptr_eq(expr.context(), prior.context()));
    }
}

#[test]
fn dirichlet_vector_flows_through_frame_arithmetic() {
    let ctx = CalculationContext::seeded(11).into_shared();
    let d: Rc<dyn RandomVector> =
        Rc::new(Dirichlet::new(vec![500.0, 300.0, 200.0]).unwrap());
    let shares = Expr::sample_vector_in(d, &ctx);
    let doubled_half = 0.5 * &(2.0 * &shares);
    let out = doubled_half.output(1_000).unwrap();
    let original = shares.output(1_000).unwrap();
    let result = out.as_frame().unwrap();
    let base = original.as_frame().unwrap();
    for (result_col, base_col) in result.columns().iter().zip(base.columns()) {
        assert!(result_col.approx_eq(base_col, 1e-12));
    }
}
