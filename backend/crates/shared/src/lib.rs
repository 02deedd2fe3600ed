//! Shared Kernel - Vocabulary shared by every clinic crate
//!
//! This crate contains the small core that all domains agree on:
//! - Unified error type and its HTTP mapping
//! - Human-readable entity identifiers and typed UUID ids
//! - Pagination and sort allow-lists for list endpoints
//! - Request extractors that report malformed input as `400`
//! - Router helpers: trailing-slash collections and the JSON `404` fallback
//! - OpenAPI security scheme shared by every feature document
//!
//! Only things whose meaning is identical across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod pagination;
#[cfg(feature = "axum")]
pub mod routing;
