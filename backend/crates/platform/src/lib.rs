//! Platform Crate - Technical Infrastructure
//!
//! Security primitives shared by the HTTP crates:
//! - Password hashing (Argon2id with fixed parameters)
//! - Signed, time-limited auth tokens (HS256 JWT)
//! - `Authorization: Bearer` header parsing

pub mod bearer;
pub mod password;
pub mod token;
