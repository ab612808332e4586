//! Parameter and prior declarations.
//!
//! Every continuous parameter declares a domain and an explicit prior.
//! "No prior given" is not representable: a flat prior must be written as
//! `Uniform`, so its (constant) log-density contribution is always an
//! explicit part of the log-posterior.

use serde::{Deserialize, Serialize};

/// Support of a continuous parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Probabilities and rates in [0, 1].
    UnitInterval,
    /// Scale-like parameters in (0, inf).
    Positive,
    /// Unconstrained parameters.
    Real,
    /// Correlation-like parameters in [-1, 1].
    Correlation,
}

impl Domain {
    /// Whether `x` lies inside the domain. NaN is never inside.
    pub fn contains(&self, x: f64) -> bool {
        if x.is_nan() {
            return false;
        }
        match self {
            Domain::UnitInterval => (0.0..=1.0).contains(&x),
            Domain::Positive => x > 0.0 && x.is_finite(),
            Domain::Real => x.is_finite(),
            Domain::Correlation => (-1.0..=1.0).contains(&x),
        }
    }
}

/// Prior distribution over one continuous parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dist", rename_all = "snake_case")]
pub enum PriorSpec {
    /// Flat over the declared domain. Contributes a constant 0 to the
    /// log-posterior (improper on an unbounded domain, which is allowed but
    /// must be this explicit).
    Uniform,
    /// Beta(alpha, beta); only valid on the unit interval.
    Beta { alpha: f64, beta: f64 },
    /// Gamma(shape, rate), rate parameterization; only valid on positives.
    Gamma { shape: f64, rate: f64 },
    /// Normal(mean, sd); only valid on the real line.
    Normal { mean: f64, sd: f64 },
}

impl PriorSpec {
    /// Domains this prior may be declared on.
    pub fn supports(&self, domain: Domain) -> bool {
        match self {
            PriorSpec::Uniform => true,
            PriorSpec::Beta { .. } => domain == Domain::UnitInterval,
            PriorSpec::Gamma { .. } => domain == Domain::Positive,
            PriorSpec::Normal { .. } => domain == Domain::Real,
        }
    }
}

/// One declared continuous parameter.
///
/// The order of declarations fixes the layout of the parameter vector the
/// sampler proposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// Name, unique within a model.
    pub name: String,
    /// Support; proposals outside it are rejected, not errors.
    pub domain: Domain,
    /// Explicit prior over the parameter.
    pub prior: PriorSpec,
}

impl ParameterDecl {
    /// Convenience constructor for the common rate-in-[0,1] case.
    pub fn rate(name: impl Into<String>, prior: PriorSpec) -> Self {
        Self {
            name: name.into(),
            domain: Domain::UnitInterval,
            prior,
        }
    }
}

/// Complete prior configuration for a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPriors {
    /// Schema version for compatibility checking.
    pub schema_version: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered parameter declarations.
    pub parameters: Vec<ParameterDecl>,
}

impl ModelPriors {
    /// Build a prior configuration from an ordered declaration list.
    pub fn new(parameters: Vec<ParameterDecl>) -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            parameters,
        }
    }

    /// Number of declared parameters (the sampler-facing dimension on the
    /// constrained scale).
    pub fn dim(&self) -> usize {
        self.parameters.len()
    }

    /// Index of a parameter by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }
}
