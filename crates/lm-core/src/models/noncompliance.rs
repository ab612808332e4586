//! One-sided noncompliance in a randomized-encouragement trial.
//!
//! Each unit is a Complier (takes treatment iff assigned) or a Never-Taker
//! (never takes treatment); Always-Takers and Defiers are ruled out because
//! nobody in the control arm can obtain treatment. The exclusion restriction
//! gives Never-Takers a single outcome rate regardless of assignment, while
//! Compliers have separate treated/control rates.
//!
//! Observed (assignment, receipt) patterns partition as:
//! - assigned + received        -> Complier, determined
//! - assigned + not received    -> Never-Taker, determined
//! - not assigned, not received -> Complier or Never-Taker, mixture
//! - not assigned but received  -> impossible; rejected at load time

use lm_config::{
    validate::{validate_compliance_trial, validate_priors},
    ComplianceTrial, ModelPriors, ParameterDecl, PriorSpec,
};
use lm_math::bernoulli::bernoulli_counts_log_pmf;

use crate::model::{config_error, LatentClassModel};
use crate::partition::Partition;

/// Latent class: takes treatment exactly when assigned.
pub const COMPLIER: usize = 0;
/// Latent class: never takes treatment.
pub const NEVER_TAKER: usize = 1;

/// Parameter vector layout.
const COMPLIER_SHARE: usize = 0;
const COMPLIER_TREATED_RATE: usize = 1;
const NEVER_TAKER_RATE: usize = 2;
const COMPLIER_CONTROL_RATE: usize = 3;

/// A one-sided noncompliance outcome model over a grouped trial table.
#[derive(Debug, Clone)]
pub struct NoncomplianceModel {
    trial: ComplianceTrial,
    priors: ModelPriors,
}

impl NoncomplianceModel {
    /// Validate the trial table and priors and bind them into a model.
    pub fn new(trial: ComplianceTrial, priors: ModelPriors) -> lm_common::Result<Self> {
        validate_compliance_trial(&trial).map_err(config_error)?;
        validate_priors(&priors).map_err(config_error)?;
        if priors.dim() != 4 {
            return Err(lm_common::Error::Config(format!(
                "noncompliance model requires 4 parameters \
                 (complier share + three outcome rates), got {}",
                priors.dim()
            )));
        }
        Ok(Self { trial, priors })
    }

    /// Flat priors over all four rates.
    pub fn default_priors() -> ModelPriors {
        ModelPriors::new(vec![
            ParameterDecl::rate("complier_share", PriorSpec::Uniform),
            ParameterDecl::rate("complier_treated_rate", PriorSpec::Uniform),
            ParameterDecl::rate("never_taker_rate", PriorSpec::Uniform),
            ParameterDecl::rate("complier_control_rate", PriorSpec::Uniform),
        ])
    }

    pub fn trial(&self) -> &ComplianceTrial {
        &self.trial
    }

    /// Outcome rate for a class under the group's assignment arm.
    fn outcome_rate(&self, class: usize, assigned: bool, params: &[f64]) -> f64 {
        match (class, assigned) {
            (COMPLIER, true) => params[COMPLIER_TREATED_RATE],
            (COMPLIER, false) => params[COMPLIER_CONTROL_RATE],
            // Exclusion restriction: assignment moves outcomes only through
            // receipt, so Never-Takers share one rate across arms.
            _ => params[NEVER_TAKER_RATE],
        }
    }
}

impl LatentClassModel for NoncomplianceModel {
    fn num_classes(&self) -> usize {
        2
    }

    fn num_units(&self) -> usize {
        self.trial.groups.len()
    }

    fn priors(&self) -> &ModelPriors {
        &self.priors
    }

    fn partition(&self, unit: usize) -> Partition {
        let group = &self.trial.groups[unit];
        match (group.assigned, group.received) {
            (true, true) => Partition::Determined(COMPLIER),
            (true, false) => Partition::Determined(NEVER_TAKER),
            (false, false) => Partition::Ambiguous(vec![COMPLIER, NEVER_TAKER]),
            (false, true) => Partition::Impossible,
        }
    }

    fn unit_weight(&self, unit: usize) -> f64 {
        self.trial.groups[unit].count as f64
    }

    fn log_class_weight(&self, class: usize, params: &[f64]) -> f64 {
        let share = params[COMPLIER_SHARE];
        if class == COMPLIER {
            share.ln()
        } else {
            (-share).ln_1p()
        }
    }

    fn log_outcome_density(&self, unit: usize, class: usize, params: &[f64]) -> f64 {
        let group = &self.trial.groups[unit];
        let successes = group.successes as f64;
        let failures = (group.count - group.successes) as f64;
        let rate = self.outcome_rate(class, group.assigned, params);
        bernoulli_counts_log_pmf(successes, failures, rate)
    }
}
