//! Site availability with repeated detection visits.
//!
//! Each site is Available or Unavailable. An available site is surveyed J
//! times, each visit comprising K detection subtrials with per-subtrial
//! detection rate p; an unavailable site can never produce a detection.
//! Any detection therefore determines the site as Available, while a
//! never-detected site is a two-way mixture: it may be unavailable, or
//! available and missed on every subtrial of every visit.
//!
//! Visits are conditionally independent given the latent class, an
//! assumption inherited from the source analyses and declared here rather
//! than re-derived. On the log scale that makes the never-detected available
//! density an additive repeat, `J * K * log(1 - p)`, which the outer
//! availability mixture then combines with the unavailable branch.

use lm_config::{
    validate::{validate_detection_survey, validate_priors},
    DetectionSurvey, ModelPriors, ParameterDecl, PriorSpec,
};
use lm_math::bernoulli::binomial_log_pmf;
use lm_math::log_repeat;

use crate::model::{config_error, LatentClassModel};
use crate::partition::Partition;

/// Latent class: the site hosts the species.
pub const AVAILABLE: usize = 0;
/// Latent class: the site does not.
pub const UNAVAILABLE: usize = 1;

/// Parameter vector layout.
const AVAILABILITY: usize = 0;
const DETECTION_RATE: usize = 1;

/// A two-level occupancy model over a repeated-visit detection survey.
#[derive(Debug, Clone)]
pub struct OccupancyModel {
    survey: DetectionSurvey,
    priors: ModelPriors,
}

impl OccupancyModel {
    pub fn new(survey: DetectionSurvey, priors: ModelPriors) -> lm_common::Result<Self> {
        validate_detection_survey(&survey).map_err(config_error)?;
        validate_priors(&priors).map_err(config_error)?;
        if priors.dim() != 2 {
            return Err(lm_common::Error::Config(format!(
                "occupancy model requires 2 parameters (availability + detection rate), got {}",
                priors.dim()
            )));
        }
        Ok(Self { survey, priors })
    }

    /// Flat priors over availability and detection rate.
    pub fn default_priors() -> ModelPriors {
        ModelPriors::new(vec![
            ParameterDecl::rate("availability", PriorSpec::Uniform),
            ParameterDecl::rate("detection_rate", PriorSpec::Uniform),
        ])
    }

    pub fn survey(&self) -> &DetectionSurvey {
        &self.survey
    }
}

impl LatentClassModel for OccupancyModel {
    fn num_classes(&self) -> usize {
        2
    }

    fn num_units(&self) -> usize {
        self.survey.sites.len()
    }

    fn priors(&self) -> &ModelPriors {
        &self.priors
    }

    fn partition(&self, unit: usize) -> Partition {
        if self.survey.sites[unit].never_detected() {
            Partition::Ambiguous(vec![AVAILABLE, UNAVAILABLE])
        } else {
            Partition::Determined(AVAILABLE)
        }
    }

    fn log_class_weight(&self, class: usize, params: &[f64]) -> f64 {
        let omega = params[AVAILABILITY];
        if class == AVAILABLE {
            omega.ln()
        } else {
            (-omega).ln_1p()
        }
    }

    fn log_outcome_density(&self, unit: usize, class: usize, params: &[f64]) -> f64 {
        let site = &self.survey.sites[unit];
        let subtrials = f64::from(self.survey.subtrials_per_visit);
        let rate = params[DETECTION_RATE];

        if class == UNAVAILABLE {
            // An unavailable site produces no detections with certainty.
            return if site.never_detected() {
                0.0
            } else {
                f64::NEG_INFINITY
            };
        }

        if site.never_detected() {
            // All visits share the same all-miss log-mass; reuse it as an
            // additive repeat instead of re-evaluating per visit.
            let miss = binomial_log_pmf(0.0, subtrials, rate);
            return log_repeat(miss, site.detections.len() as u32);
        }

        site.detections
            .iter()
            .map(|&d| binomial_log_pmf(d as f64, subtrials, rate))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lm_config::DetectionSite;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    fn survey(sites: Vec<Vec<u64>>, subtrials: u32) -> OccupancyModel {
        let survey = DetectionSurvey {
            description: None,
            subtrials_per_visit: subtrials,
            sites: sites
                .into_iter()
                .map(|detections| DetectionSite { detections })
                .collect(),
        };
        OccupancyModel::new(survey, OccupancyModel::default_priors()).unwrap()
    }

    #[test]
    fn detected_site_is_determined_available() {
        let m = survey(vec![vec![0, 2, 0], vec![0, 0, 0]], 18);
        assert_eq!(m.partition(0), Partition::Determined(AVAILABLE));
        assert_eq!(
            m.partition(1),
            Partition::Ambiguous(vec![AVAILABLE, UNAVAILABLE])
        );
    }

    #[test]
    fn unavailable_branch_is_certain_or_impossible() {
        let m = survey(vec![vec![0, 2, 0], vec![0, 0, 0]], 18);
        let params = [0.4, 0.1];
        assert_eq!(m.log_outcome_density(1, UNAVAILABLE, &params), 0.0);
        let dead = m.log_outcome_density(0, UNAVAILABLE, &params);
        assert!(dead.is_infinite() && dead.is_sign_negative());
    }

    #[test]
    fn never_detected_available_density_is_repeat_of_all_miss() {
        let m = survey(vec![vec![0, 0, 0]], 18);
        let params = [0.4, 0.1];
        let out = m.log_outcome_density(0, AVAILABLE, &params);
        // 3 visits x 18 subtrials, all misses.
        let expected = 54.0 * (1.0f64 - 0.1).ln();
        assert!(approx_eq(out, expected, 1e-10), "out={out} exp={expected}");
    }

    #[test]
    fn detected_site_density_sums_per_visit_binomials() {
        let m = survey(vec![vec![1, 0, 3]], 18);
        let params = [0.4, 0.1];
        let out = m.log_outcome_density(0, AVAILABLE, &params);
        let expected = binomial_log_pmf(1.0, 18.0, 0.1)
            + binomial_log_pmf(0.0, 18.0, 0.1)
            + binomial_log_pmf(3.0, 18.0, 0.1);
        assert!(approx_eq(out, expected, 1e-12));
    }

    #[test]
    fn detection_rate_one_never_detected_site_rejects_available_branch() {
        // p = 1 makes a silent available site impossible, but not NaN.
        let m = survey(vec![vec![0, 0]], 5);
        let out = m.log_outcome_density(0, AVAILABLE, &[0.5, 1.0]);
        assert!(out.is_infinite() && out.is_sign_negative());
    }
}
