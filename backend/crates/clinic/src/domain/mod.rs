//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the scoring
//! service seam.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use repository::ClinicStore;
pub use service::{PredictionError, PredictionOutcome, PredictionService};
