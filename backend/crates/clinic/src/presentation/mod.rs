//! Presentation Layer
//!
//! HTTP handlers, DTOs, router and the OpenAPI document. Authorization
//! comes from `auth::middleware`.

pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod router;

pub use handlers::ClinicAppState;
pub use openapi::ClinicApi;
pub use router::{clinic_router, clinic_router_generic};
