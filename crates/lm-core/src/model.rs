//! The latent-class model abstraction and load-time validation.

use lm_common::Error;
use lm_config::{ModelPriors, ValidationError};
use tracing::debug;

use crate::partition::Partition;

/// A latent-class model over a fixed, immutable set of units.
///
/// Implementations hold the validated data table and the parameter/prior
/// declarations; all methods are pure reads. The parameter vector is owned
/// by the caller (ultimately the sampling engine) and passed by reference at
/// every evaluation.
pub trait LatentClassModel {
    /// Number of latent classes.
    fn num_classes(&self) -> usize;

    /// Number of unit records.
    fn num_units(&self) -> usize;

    /// Ordered parameter declarations (layout of the parameter vector).
    fn priors(&self) -> &ModelPriors;

    /// Classes consistent with the unit's observed covariates.
    fn partition(&self, unit: usize) -> Partition;

    /// Frequency weight of the unit record (grouped data); 1 for ungrouped.
    fn unit_weight(&self, unit: usize) -> f64 {
        let _ = unit;
        1.0
    }

    /// Log of the unconditional class-prior probability for `class`.
    ///
    /// These are the mixture weights; they are never renormalized over a
    /// unit's consistent subset.
    fn log_class_weight(&self, class: usize, params: &[f64]) -> f64;

    /// Log-density of the unit's observed outcome under `class`'s outcome
    /// distribution at the given parameter point.
    fn log_outcome_density(&self, unit: usize, class: usize, params: &[f64]) -> f64;
}

/// Check every unit's partition once, before any sampling.
///
/// A structurally impossible covariate pattern, an ambiguous subset with
/// fewer than two classes, or a class index out of range are all fatal data
/// errors here; they can never become per-iteration conditions.
pub fn validate_units<M: LatentClassModel + ?Sized>(model: &M) -> lm_common::Result<()> {
    let num_classes = model.num_classes();
    for unit in 0..model.num_units() {
        match model.partition(unit) {
            Partition::Impossible => {
                return Err(Error::ImpossibleRecord {
                    index: unit,
                    message: "covariate pattern excluded by the structural assumptions".into(),
                });
            }
            Partition::Determined(class) => {
                if class >= num_classes {
                    return Err(Error::InvalidData(format!(
                        "unit {unit}: class index {class} out of range ({num_classes} classes)"
                    )));
                }
            }
            Partition::Ambiguous(classes) => {
                if classes.len() < 2 {
                    return Err(Error::InvalidData(format!(
                        "unit {unit}: ambiguous partition with {} class(es)",
                        classes.len()
                    )));
                }
                if let Some(&class) = classes.iter().find(|&&c| c >= num_classes) {
                    return Err(Error::InvalidData(format!(
                        "unit {unit}: class index {class} out of range ({num_classes} classes)"
                    )));
                }
            }
        }
        let weight = model.unit_weight(unit);
        if !(weight.is_finite() && weight > 0.0) {
            return Err(Error::InvalidData(format!(
                "unit {unit}: frequency weight must be positive and finite, got {weight}"
            )));
        }
    }
    debug!(
        units = model.num_units(),
        classes = num_classes,
        "unit partitions validated"
    );
    Ok(())
}

/// Lift a configuration/data validation failure into the workspace error.
pub fn config_error(err: ValidationError) -> Error {
    match err {
        ValidationError::ImpossiblePattern { index, message } => {
            Error::ImpossibleRecord { index, message }
        }
        ValidationError::IoError(message) | ValidationError::ParseError(message) => {
            Error::InvalidData(message)
        }
        other => Error::Config(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lm_config::{ParameterDecl, PriorSpec};

    /// Minimal two-class model whose partition is scripted per unit.
    struct Scripted {
        priors: ModelPriors,
        partitions: Vec<Partition>,
    }

    impl Scripted {
        fn new(partitions: Vec<Partition>) -> Self {
            Self {
                priors: ModelPriors::new(vec![ParameterDecl::rate("share", PriorSpec::Uniform)]),
                partitions,
            }
        }
    }

    impl LatentClassModel for Scripted {
        fn num_classes(&self) -> usize {
            2
        }
        fn num_units(&self) -> usize {
            self.partitions.len()
        }
        fn priors(&self) -> &ModelPriors {
            &self.priors
        }
        fn partition(&self, unit: usize) -> Partition {
            self.partitions[unit].clone()
        }
        fn log_class_weight(&self, class: usize, params: &[f64]) -> f64 {
            if class == 0 {
                params[0].ln()
            } else {
                (-params[0]).ln_1p()
            }
        }
        fn log_outcome_density(&self, _unit: usize, _class: usize, _params: &[f64]) -> f64 {
            -1.0
        }
    }

    #[test]
    fn accepts_determined_and_ambiguous() {
        let model = Scripted::new(vec![
            Partition::Determined(0),
            Partition::Ambiguous(vec![0, 1]),
        ]);
        assert!(validate_units(&model).is_ok());
    }

    #[test]
    fn impossible_is_fatal_with_unit_index() {
        let model = Scripted::new(vec![Partition::Determined(1), Partition::Impossible]);
        let err = validate_units(&model).unwrap_err();
        match err {
            Error::ImpossibleRecord { index, .. } => assert_eq!(index, 1),
            other => panic!("expected ImpossibleRecord, got {other:?}"),
        }
    }

    #[test]
    fn rejects_degenerate_ambiguous_subset() {
        let model = Scripted::new(vec![Partition::Ambiguous(vec![0])]);
        assert!(validate_units(&model).is_err());
    }

    #[test]
    fn rejects_out_of_range_class() {
        let model = Scripted::new(vec![Partition::Determined(5)]);
        assert!(validate_units(&model).is_err());
        let model = Scripted::new(vec![Partition::Ambiguous(vec![0, 7])]);
        assert!(validate_units(&model).is_err());
    }

    #[test]
    fn config_error_preserves_impossible_pattern() {
        let err = config_error(ValidationError::ImpossiblePattern {
            index: 4,
            message: "received without assignment".into(),
        });
        assert!(matches!(err, Error::ImpossibleRecord { index: 4, .. }));
    }
}
