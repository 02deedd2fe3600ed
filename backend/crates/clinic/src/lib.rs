//! Clinic Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, scoring seam
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory stores, HTTP scoring client
//! - `presentation/` - HTTP handlers, DTOs, router, OpenAPI document
//!
//! ## Features
//! - Patients, appointments, medical records and assessments with
//!   soft delete and paginated listing
//! - Risk predictions for assessments from an external scoring service
//!
//! Every route is guarded by the `auth` crate's token gate and role
//! allow-lists.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use domain::{ClinicStore, PredictionError, PredictionOutcome, PredictionService};
pub use error::{ClinicError, ClinicResult};
pub use infra::{HttpPredictionClient, InMemoryClinicRepository, PgClinicRepository};
pub use infra::prediction::DEFAULT_PREDICTION_URL;
pub use presentation::openapi::ClinicApi;
pub use presentation::router::{clinic_router, clinic_router_generic};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
