//! Worked latent-class models.
//!
//! Each model binds a validated data table and a prior configuration to the
//! [`LatentClassModel`](crate::model::LatentClassModel) trait; everything
//! downstream (accumulation, transforms, gradients) is shared machinery.

pub mod noncompliance;
pub mod occupancy;
pub mod topic;

pub use noncompliance::NoncomplianceModel;
pub use occupancy::OccupancyModel;
pub use topic::TopicModel;
