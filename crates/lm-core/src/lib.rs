//! Latent-class marginal likelihood evaluation.
//!
//! A latent-class model assigns each observed unit a finite set of candidate
//! classes; which classes are consistent with a unit's observed covariates is
//! decided by the model's partition rule. The evaluator marginalizes the
//! latent class out of every unit's likelihood on the log scale and sums the
//! result, together with explicit prior log-densities, into one
//! log-posterior-density scalar.
//!
//! The external MCMC engine is a collaborator, not a component: this crate
//! exposes a pure [`posterior::LogDensity`] function object (plus an
//! unconstrained reparameterization and a numerical gradient) and knows
//! nothing about chains, step sizes, or iteration counts.
//!
//! The binary entry point is in `main.rs`.

pub mod gradient;
pub mod model;
pub mod models;
pub mod partition;
pub mod posterior;
pub mod transform;

pub use model::{validate_units, LatentClassModel};
pub use partition::Partition;
pub use posterior::{LogDensity, LogPosterior};
pub use transform::UnconstrainedPosterior;
