use derive_more::Display;
use kernel::id;
use serde::{Deserialize, Serialize};

use super::user_role::UserRole;

/// Human-readable account id, e.g. `doctor-003-Q7fk2LmZ`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct UserId(String);

impl UserId {
    /// Mint an id for the `sequence`-th account of `role`.
    pub fn generate(role: UserRole, sequence: i64) -> Self {
        Self(id::generate(role.id_prefix(), sequence))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_uses_role_prefix() {
        let user_id = UserId::generate(UserRole::Doctor, 3);
        assert!(user_id.as_str().starts_with("doctor-003-"));
        assert_eq!(user_id.as_str().len(), "doctor-003-".len() + 8);
    }

    #[test]
    fn test_user_id_from_db() {
        let user_id = UserId::from_db("staff-010-abcdEFGH");
        assert_eq!(user_id.to_string(), "staff-010-abcdEFGH");
    }
}
