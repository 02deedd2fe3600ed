//! Value Object Module

pub mod email;
pub mod user_id;
pub mod user_role;

pub use email::Email;
pub use user_id::UserId;
pub use user_role::UserRole;
