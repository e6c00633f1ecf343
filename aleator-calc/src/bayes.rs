//! Bayes rule over sampled probabilities
//!
//! Posterior calculations built through the calculation graph, so the
//! same prior and likelihood samples flow through the numerator and the
//! evidence. Single-figure inputs short-circuit to plain arithmetic.

use crate::context::{CalculationContext, SharedContext};
use crate::expr::{Expr, ExprSeries};
use crate::sync::sync_context;
use aleator_core::AleatorError;
use aleator_dist::{Dirichlet, DistributionError, RandomVariable, RandomVector};
use std::rc::Rc;

/// A prior or likelihood: a fixed probability, a distribution over
/// probabilities, or a labeled map of either (one entry per hypothesis).
#[derive(Clone)]
pub enum BayesTerm {
    Probability(f64),
    Distribution(Rc<dyn RandomVariable>),
    Map(Vec<(String, BayesTerm)>),
}

impl BayesTerm {
    pub fn dist(distribution: impl RandomVariable + 'static) -> Self {
        BayesTerm::Distribution(Rc::new(distribution))
    }

    fn is_map(&self) -> bool {
        matches!(self, BayesTerm::Map(_))
    }
}

impl From<f64> for BayesTerm {
    fn from(v: f64) -> Self {
        BayesTerm::Probability(v)
    }
}

/// The result of a posterior computation.
pub enum Posterior {
    /// Closed-form single figure.
    Probability(f64),
    /// Labeled single figures, one per hypothesis.
    Probabilities(Vec<(String, f64)>),
    /// A sampled calculation, context-synced and ready to evaluate.
    Calculation(Expr),
    /// One sampled calculation per hypothesis; each entry is synced
    /// internally but entries sample independently of each other.
    Series(ExprSeries),
}

/// Bayes rule for one or more binary hypotheses.
pub struct BinaryBayesRule {
    prior: BayesTerm,
    likelihood: BayesTerm,
}

impl BinaryBayesRule {
    /// Create a rule from the prior `P(A)` and likelihood `P(B|A)`.
    /// Maps may appear on either side but not nested inside each other.
    pub fn new(prior: BayesTerm, likelihood: BayesTerm) -> Result<Self, AleatorError> {
        for term in [&prior, &likelihood] {
            if let BayesTerm::Map(entries) = term {
                if entries.iter().any(|(_, t)| t.is_map()) {
                    return Err(AleatorError::invalid_argument(
                        "Bayes rule maps cannot be nested",
                    ));
                }
            }
        }
        Ok(Self { prior, likelihood })
    }

    pub fn prior(&self) -> &BayesTerm {
        &self.prior
    }

    pub fn likelihood(&self) -> &BayesTerm {
        &self.likelihood
    }

    /// The posterior `P(A|B) = P(A)P(B|A) / (P(A)P(B|A) + P(¬A)P(B|¬A))`.
    pub fn posterior(&self) -> Result<Posterior, AleatorError> {
        match (&self.prior, &self.likelihood) {
            (BayesTerm::Map(priors), BayesTerm::Map(likelihoods)) => {
                let prior_labels: Vec<&str> =
                    priors.iter().map(|(l, _)| l.as_str()).collect();
                let likelihood_labels: Vec<&str> =
                    likelihoods.iter().map(|(l, _)| l.as_str()).collect();
                if prior_labels != likelihood_labels {
                    return Err(AleatorError::invalid_argument(
                        "prior and likelihood maps must share labels",
                    ));
                }
                let pairs = priors
                    .iter()
                    .zip(likelihoods.iter())
                    .map(|((label, p), (_, l))| (label.clone(), p, l))
                    .collect();
                Self::map_posterior(pairs)
            }
            (BayesTerm::Map(priors), likelihood) => {
                let pairs = priors
                    .iter()
                    .map(|(label, p)| (label.clone(), p, likelihood))
                    .collect();
                Self::map_posterior(pairs)
            }
            (prior, BayesTerm::Map(likelihoods)) => {
                let pairs = likelihoods
                    .iter()
                    .map(|(label, l)| (label.clone(), prior, l))
                    .collect();
                Self::map_posterior(pairs)
            }
            (BayesTerm::Probability(p), BayesTerm::Probability(l)) => {
                Ok(Posterior::Probability(Self::scalar_posterior(*p, *l)))
            }
            (prior, likelihood) => {
                Ok(Posterior::Calculation(Self::pair_posterior(prior, likelihood)?))
            }
        }
    }

    fn scalar_posterior(prior: f64, likelihood: f64) -> f64 {
        let lp_1 = prior * likelihood;
        let lp_0 = (1.0 - prior) * (1.0 - likelihood);
        lp_1 / (lp_1 + lp_0)
    }

    fn map_posterior(
        pairs: Vec<(String, &BayesTerm, &BayesTerm)>,
    ) -> Result<Posterior, AleatorError> {
        let all_scalar = pairs.iter().all(|(_, p, l)| {
            matches!(p, BayesTerm::Probability(_)) && matches!(l, BayesTerm::Probability(_))
        });
        if all_scalar {
            let entries = pairs
                .into_iter()
                .map(|(label, p, l)| match (p, l) {
                    (BayesTerm::Probability(p), BayesTerm::Probability(l)) => {
                        (label, Self::scalar_posterior(*p, *l))
                    }
                    _ => unreachable!("checked all_scalar above"),
                })
                .collect();
            return Ok(Posterior::Probabilities(entries));
        }
        let items = pairs
            .into_iter()
            .map(|(label, p, l)| Ok((label, Self::pair_posterior(p, l)?)))
            .collect::<Result<Vec<_>, AleatorError>>()?;
        Ok(Posterior::Series(ExprSeries::from_exprs_unsynced(items)))
    }

    /// Build one posterior calculation; all four term values flow
    /// through a single context so the evidence reuses the numerator's
    /// samples.
    fn pair_posterior(
        prior: &BayesTerm,
        likelihood: &BayesTerm,
    ) -> Result<Expr, AleatorError> {
        let ctx = CalculationContext::new().into_shared();
        let p = Self::term_expr(prior, &ctx)?;
        let l = Self::term_expr(likelihood, &ctx)?;
        let lp_1 = &p * &l;
        let lp_0 = p.complement() * l.complement();
        let mut posterior = &lp_1 / &(&lp_1 + &lp_0);
        sync_context(&mut [&mut posterior]);
        Ok(posterior)
    }

    fn term_expr(term: &BayesTerm, ctx: &SharedContext) -> Result<Expr, AleatorError> {
        match term {
            BayesTerm::Probability(v) => Ok(Expr::value_in(*v, ctx)),
            BayesTerm::Distribution(d) => Ok(Expr::sample_in(d.clone(), ctx)),
            BayesTerm::Map(_) => Err(AleatorError::invalid_argument(
                "nested map in Bayes term",
            )),
        }
    }
}

/// The likelihood side of a multiple-hypothesis rule.
pub enum DirichletLikelihood {
    Single(Dirichlet),
    Map(Vec<(String, Dirichlet)>),
}

/// Bayes rule for several mutually exclusive hypotheses, with
/// Dirichlet-distributed prior and likelihood.
pub struct MultipleBayesRule {
    prior: Dirichlet,
    likelihood: DirichletLikelihood,
}

impl MultipleBayesRule {
    pub fn new(prior: Dirichlet, likelihood: Dirichlet) -> Self {
        Self {
            prior,
            likelihood: DirichletLikelihood::Single(likelihood),
        }
    }

    pub fn with_likelihood_map(prior: Dirichlet, likelihood: Vec<(String, Dirichlet)>) -> Self {
        Self {
            prior,
            likelihood: DirichletLikelihood::Map(likelihood),
        }
    }

    /// Build a rule from evidence counts: one row of per-category counts
    /// per evidence state. The prior concentrates `1 + column_total *
    /// prior_weight`; each likelihood row concentrates `1 + count`.
    pub fn from_counts(
        category_labels: &[&str],
        rows: Vec<(String, Vec<f64>)>,
        prior_weight: f64,
    ) -> Result<Self, DistributionError> {
        if rows.iter().any(|(_, counts)| counts.len() != category_labels.len()) {
            return Err(DistributionError::invalid(
                "every count row must have one entry per category",
            ));
        }
        let mut totals = vec![0.0; category_labels.len()];
        for (_, counts) in &rows {
            for (total, &count) in totals.iter_mut().zip(counts) {
                *total += count;
            }
        }
        let prior = Dirichlet::with_labels(
            category_labels
                .iter()
                .zip(&totals)
                .map(|(label, total)| (label.to_string(), 1.0 + total * prior_weight))
                .collect(),
        )?;
        let likelihood = rows
            .into_iter()
            .map(|(evidence, counts)| {
                let alpha = category_labels
                    .iter()
                    .zip(counts)
                    .map(|(label, count)| (label.to_string(), 1.0 + count))
                    .collect();
                Ok((evidence, Dirichlet::with_labels(alpha)?))
            })
            .collect::<Result<Vec<_>, DistributionError>>()?;
        Ok(Self {
            prior,
            likelihood: DirichletLikelihood::Map(likelihood),
        })
    }

    pub fn prior(&self) -> &Dirichlet {
        &self.prior
    }

    /// The posterior over hypotheses: `(prior * likelihood)` normalized
    /// by its row-wise sum, all on shared samples.
    pub fn posterior(&self) -> Result<Posterior, AleatorError> {
        match &self.likelihood {
            DirichletLikelihood::Single(likelihood) => Ok(Posterior::Calculation(
                Self::dirichlet_posterior(&self.prior, likelihood)?,
            )),
            DirichletLikelihood::Map(likelihoods) => {
                let items = likelihoods
                    .iter()
                    .map(|(label, likelihood)| {
                        Ok((
                            label.clone(),
                            Self::dirichlet_posterior(&self.prior, likelihood)?,
                        ))
                    })
                    .collect::<Result<Vec<_>, AleatorError>>()?;
                Ok(Posterior::Series(ExprSeries::from_exprs_unsynced(items)))
            }
        }
    }

    fn dirichlet_posterior(
        prior: &Dirichlet,
        likelihood: &Dirichlet,
    ) -> Result<Expr, AleatorError> {
        if prior.num_components() != likelihood.num_components() {
            return Err(AleatorError::invalid_argument(
                "prior and likelihood must have the same number of components",
            ));
        }
        let ctx = CalculationContext::new().into_shared();
        let prior_rc: Rc<dyn RandomVector> = Rc::new(prior.clone());
        let likelihood_rc: Rc<dyn RandomVector> = Rc::new(likelihood.clone());
        let p = Expr::sample_vector_in(prior_rc, &ctx);
        let l = Expr::sample_vector_in(likelihood_rc, &ctx);
        let numerator = &p * &l;
        let mut posterior = &numerator / &numerator.sum();
        sync_context(&mut [&mut posterior]);
        Ok(posterior)
    }
}
