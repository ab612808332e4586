//! Latent-marginal configuration: parameter declarations, priors, and
//! input data tables.
//!
//! This crate provides:
//! - Typed Rust structs for parameter/prior declarations and data files
//! - JSON loading
//! - Semantic validation (including structural-impossibility checks that
//!   must fail at load time, before any sampling)

pub mod data;
pub mod priors;
pub mod validate;

pub use data::{ComplianceGroup, ComplianceTrial, DetectionSite, DetectionSurvey, TopicCorpus};
pub use priors::{Domain, ModelPriors, ParameterDecl, PriorSpec};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
