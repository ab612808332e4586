//! Latent-marginal shared types, errors, and result alias.

pub mod error;

pub use error::{Error, ErrorCategory, Result};
