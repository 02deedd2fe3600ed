//! User Entity
//!
//! A clinic staff account. The password hash never leaves the auth crate's
//! domain and infrastructure layers.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub full_name: String,
    /// Login handle, unique among live accounts
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<HashedPassword>,
    pub role: Option<UserRole>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
    }
}

impl User {
    pub fn new(
        user_id: UserId,
        full_name: String,
        email: Email,
        password_hash: HashedPassword,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            full_name,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: UserChanges) {
        if changes.is_empty() {
            return;
        }
        if let Some(full_name) = changes.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        self.updated_at = Utc::now();
    }
}
