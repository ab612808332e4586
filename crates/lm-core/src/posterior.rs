//! The aggregate log-posterior-density accumulator.
//!
//! Combines per-unit marginal log-probabilities with explicit prior
//! log-densities into the single scalar the sampling engine consumes. The
//! accumulator is a pure function of (immutable data, parameter vector):
//! no interior mutability, no I/O, bit-identical output for identical input.

use lm_config::{ParameterDecl, PriorSpec};
use lm_math::{beta_log_pdf, gamma_log_pdf, log_mix, log_mix2, normal_log_pdf};
use tracing::trace;

use crate::model::{validate_units, LatentClassModel};
use crate::partition::Partition;

/// A log-density function object over a fixed-dimension parameter vector.
///
/// This is the sampler-facing surface: the engine proposes a point and
/// expects back a finite scalar, or NEG_INFINITY to reject the proposal.
/// Implementations must be pure and safe to call concurrently from
/// independent chains through a shared reference.
pub trait LogDensity {
    /// Dimension of the parameter vector.
    fn dim(&self) -> usize;

    /// Log-density at `params`, up to an additive constant.
    fn log_density(&self, params: &[f64]) -> f64;
}

/// The total log-posterior of a latent-class model on the constrained
/// (natural) parameter scale.
#[derive(Debug, Clone)]
pub struct LogPosterior<M> {
    model: M,
}

impl<M: LatentClassModel> LogPosterior<M> {
    /// Validate the model's units once and wrap it as a log-density.
    ///
    /// Data-validity failures surface here, before any sampling begins.
    pub fn new(model: M) -> lm_common::Result<Self> {
        validate_units(&model)?;
        Ok(Self { model })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Total log-posterior density at `params`.
    ///
    /// Returns NEG_INFINITY when any parameter falls outside its declared
    /// domain (the proposal is rejected, not an error) and for data that a
    /// boundary-deterministic parameter point makes impossible. Never
    /// returns NaN and never panics on a well-validated model.
    pub fn log_posterior(&self, params: &[f64]) -> f64 {
        let decls = &self.model.priors().parameters;
        if params.len() != decls.len() {
            trace!(
                expected = decls.len(),
                actual = params.len(),
                "dimension mismatch; rejecting point"
            );
            return f64::NEG_INFINITY;
        }

        // Domain check first: out-of-support proposals are rejected before
        // any data term is touched.
        for (decl, &value) in decls.iter().zip(params.iter()) {
            if !decl.domain.contains(value) {
                trace!(parameter = %decl.name, value, "domain violation; rejecting point");
                return f64::NEG_INFINITY;
            }
        }

        let mut total = 0.0;
        for (decl, &value) in decls.iter().zip(params.iter()) {
            total += prior_log_density(decl, value);
        }
        if total == f64::NEG_INFINITY {
            return f64::NEG_INFINITY;
        }

        for unit in 0..self.model.num_units() {
            total += self.model.unit_weight(unit) * self.unit_log_marginal(unit, params);
            if total == f64::NEG_INFINITY {
                return f64::NEG_INFINITY;
            }
        }

        if !total.is_finite() {
            // NaN never belongs in the engine's hands, and +inf can only
            // come from an improper prior spike at a measure-zero boundary
            // point; both reject the proposal.
            trace!(total, "non-finite log-posterior; rejecting point");
            return f64::NEG_INFINITY;
        }
        total
    }

    /// Marginal log-probability of one unit with its latent class summed out
    /// over the consistent subset.
    pub fn unit_log_marginal(&self, unit: usize, params: &[f64]) -> f64 {
        match self.model.partition(unit) {
            Partition::Determined(class) => {
                self.model.log_class_weight(class, params)
                    + self.model.log_outcome_density(unit, class, params)
            }
            Partition::Ambiguous(classes) => match classes.as_slice() {
                &[a, b] => log_mix2(
                    self.model.log_class_weight(a, params),
                    self.model.log_outcome_density(unit, a, params),
                    self.model.log_class_weight(b, params),
                    self.model.log_outcome_density(unit, b, params),
                ),
                subset => {
                    let terms: Vec<(f64, f64)> = subset
                        .iter()
                        .map(|&class| {
                            (
                                self.model.log_class_weight(class, params),
                                self.model.log_outcome_density(unit, class, params),
                            )
                        })
                        .collect();
                    log_mix(&terms)
                }
            },
            // Unreachable on a validated model; a zero-probability record
            // would otherwise poison the sum silently.
            Partition::Impossible => f64::NEG_INFINITY,
        }
    }
}

impl<M: LatentClassModel> LogDensity for LogPosterior<M> {
    fn dim(&self) -> usize {
        self.model.priors().dim()
    }

    fn log_density(&self, params: &[f64]) -> f64 {
        self.log_posterior(params)
    }
}

/// Log-density contribution of one declared prior at an in-domain value.
fn prior_log_density(decl: &ParameterDecl, value: f64) -> f64 {
    match decl.prior {
        // Explicitly flat: contributes a constant (0) over the domain.
        PriorSpec::Uniform => 0.0,
        PriorSpec::Beta { alpha, beta } => beta_log_pdf(value, alpha, beta),
        PriorSpec::Gamma { shape, rate } => gamma_log_pdf(value, shape, rate),
        PriorSpec::Normal { mean, sd } => normal_log_pdf(value, mean, sd),
    }
}

/// Hint that the returned value signals rejection of the proposed point.
pub fn is_rejection(log_density: f64) -> bool {
    log_density == f64::NEG_INFINITY
}
