//! Entity Module

pub mod auth_context;
pub mod user;

pub use auth_context::AuthContext;
pub use user::{User, UserChanges};
