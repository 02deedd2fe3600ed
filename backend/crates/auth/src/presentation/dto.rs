//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// `admin`, `doctor` or `staff`
    pub role: String,
}

/// Account summary returned by register
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[schema(value_type = String, example = "doctor")]
    pub role: UserRole,
}

/// Register response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: RegisteredUser,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            message: "User Registered",
            user: RegisteredUser {
                id: user.user_id.to_string(),
                full_name: user.full_name,
                email: user.email.to_string(),
                role: user.role,
            },
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    #[schema(value_type = String, example = "doctor")]
    pub role: UserRole,
}

// ============================================================================
// User Management
// ============================================================================

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[schema(value_type = String, example = "doctor")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id.to_string(),
            full_name: user.full_name,
            email: user.email.to_string(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `role` filter of the user list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub role: Option<String>,
}

/// Update request. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Update response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateUserResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: &'static str,
}
