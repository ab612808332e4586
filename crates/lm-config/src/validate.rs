//! Semantic validation for declarations and data tables.
//!
//! Data-validity problems are load-time failures: a structurally impossible
//! covariate pattern must be reported here, before any sampling, and never
//! handled per-iteration.

use thiserror::Error;

use crate::data::{ComplianceTrial, DetectionSurvey, TopicCorpus};
use crate::priors::{ModelPriors, PriorSpec};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration and data validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Record {index} is structurally impossible: {message}")]
    ImpossiblePattern { index: usize, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::ImpossiblePattern { .. } => 21,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a prior configuration semantically.
pub fn validate_priors(priors: &ModelPriors) -> ValidationResult<()> {
    if priors.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: priors.schema_version.clone(),
        });
    }
    if priors.parameters.is_empty() {
        return Err(ValidationError::SemanticError(
            "priors must declare at least one parameter".to_string(),
        ));
    }

    for (i, decl) in priors.parameters.iter().enumerate() {
        if decl.name.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("parameters[{i}].name"),
                message: "name must be non-empty".to_string(),
            });
        }
        if priors.parameters[..i].iter().any(|p| p.name == decl.name) {
            return Err(ValidationError::InvalidValue {
                field: format!("parameters[{i}].name"),
                message: format!("duplicate parameter name '{}'", decl.name),
            });
        }
        if !decl.prior.supports(decl.domain) {
            return Err(ValidationError::InvalidValue {
                field: format!("parameters[{i}].prior"),
                message: format!(
                    "prior {:?} is not supported on domain {:?}",
                    decl.prior, decl.domain
                ),
            });
        }
        validate_hyperparams(&decl.name, &decl.prior)?;
    }

    Ok(())
}

fn validate_hyperparams(name: &str, prior: &PriorSpec) -> ValidationResult<()> {
    let bad = |field: &str, value: f64| ValidationError::InvalidValue {
        field: format!("{name}.{field}"),
        message: format!("expected positive and finite, got {value}"),
    };
    match *prior {
        PriorSpec::Uniform => Ok(()),
        PriorSpec::Beta { alpha, beta } => {
            if !(alpha.is_finite() && alpha > 0.0) {
                return Err(bad("alpha", alpha));
            }
            if !(beta.is_finite() && beta > 0.0) {
                return Err(bad("beta", beta));
            }
            Ok(())
        }
        PriorSpec::Gamma { shape, rate } => {
            if !(shape.is_finite() && shape > 0.0) {
                return Err(bad("shape", shape));
            }
            if !(rate.is_finite() && rate > 0.0) {
                return Err(bad("rate", rate));
            }
            Ok(())
        }
        PriorSpec::Normal { mean, sd } => {
            if !mean.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{name}.mean"),
                    message: format!("expected finite, got {mean}"),
                });
            }
            if !(sd.is_finite() && sd > 0.0) {
                return Err(bad("sd", sd));
            }
            Ok(())
        }
    }
}

/// Validate a noncompliance trial table.
///
/// Under one-sided noncompliance nobody can receive treatment without being
/// assigned to it; such a record is a data defect, not a modeling case.
pub fn validate_compliance_trial(trial: &ComplianceTrial) -> ValidationResult<()> {
    if trial.groups.is_empty() {
        return Err(ValidationError::SemanticError(
            "trial has no groups".to_string(),
        ));
    }
    for (i, group) in trial.groups.iter().enumerate() {
        if group.received && !group.assigned {
            return Err(ValidationError::ImpossiblePattern {
                index: i,
                message: "treatment received without assignment (one-sided noncompliance)"
                    .to_string(),
            });
        }
        if group.count == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("groups[{i}].count"),
                message: "group count must be positive".to_string(),
            });
        }
        if group.successes > group.count {
            return Err(ValidationError::InvalidValue {
                field: format!("groups[{i}].successes"),
                message: format!(
                    "successes {} exceed group count {}",
                    group.successes, group.count
                ),
            });
        }
    }
    Ok(())
}

/// Validate a repeated-visit detection survey.
pub fn validate_detection_survey(survey: &DetectionSurvey) -> ValidationResult<()> {
    if survey.subtrials_per_visit == 0 {
        return Err(ValidationError::InvalidValue {
            field: "subtrials_per_visit".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if survey.sites.is_empty() {
        return Err(ValidationError::SemanticError(
            "survey has no sites".to_string(),
        ));
    }
    let visits = survey.visits();
    if visits == 0 {
        return Err(ValidationError::SemanticError(
            "sites must record at least one visit".to_string(),
        ));
    }
    for (i, site) in survey.sites.iter().enumerate() {
        if site.detections.len() != visits {
            return Err(ValidationError::InvalidValue {
                field: format!("sites[{i}].detections"),
                message: format!(
                    "expected {visits} visits, got {}",
                    site.detections.len()
                ),
            });
        }
        if let Some(&d) = site
            .detections
            .iter()
            .find(|&&d| d > u64::from(survey.subtrials_per_visit))
        {
            return Err(ValidationError::InvalidValue {
                field: format!("sites[{i}].detections"),
                message: format!(
                    "detection count {d} exceeds subtrials_per_visit {}",
                    survey.subtrials_per_visit
                ),
            });
        }
    }
    Ok(())
}

/// Validate a bag-of-words corpus.
pub fn validate_topic_corpus(corpus: &TopicCorpus) -> ValidationResult<()> {
    if corpus.vocabulary < 2 {
        return Err(ValidationError::InvalidValue {
            field: "vocabulary".to_string(),
            message: "must contain at least two terms".to_string(),
        });
    }
    if corpus.topics < 2 {
        return Err(ValidationError::InvalidValue {
            field: "topics".to_string(),
            message: "must contain at least two topics".to_string(),
        });
    }
    if corpus.documents.is_empty() {
        return Err(ValidationError::SemanticError(
            "corpus has no documents".to_string(),
        ));
    }
    for (i, doc) in corpus.documents.iter().enumerate() {
        if doc.len() != corpus.vocabulary {
            return Err(ValidationError::InvalidValue {
                field: format!("documents[{i}]"),
                message: format!(
                    "expected {} term counts, got {}",
                    corpus.vocabulary,
                    doc.len()
                ),
            });
        }
    }
    Ok(())
}
