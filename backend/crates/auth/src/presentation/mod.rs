//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, middleware, and the OpenAPI document.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{RoleAllowList, authenticate, guarded, require_roles};
pub use openapi::UserApi;
pub use router::{user_router, user_router_generic};
