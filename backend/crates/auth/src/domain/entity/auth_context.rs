//! Authenticated caller, as established by the bearer token.

use crate::domain::value_object::{user_id::UserId, user_role::UserRole};

/// Placed in request extensions by the authentication middleware.
///
/// The role is the one the token was issued with; it is not re-read from
/// the store, so a role change takes effect at the next login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: UserRole,
}

impl AuthContext {
    /// Admins may manage any account; everyone else only their own.
    pub fn may_manage(&self, target: &UserId) -> bool {
        self.role.is_admin() || &self.user_id == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_may_manage() {
        let doctor = AuthContext {
            user_id: UserId::from_db("doctor-001-aaaaaaaa"),
            role: UserRole::Doctor,
        };
        let admin = AuthContext {
            user_id: UserId::from_db("admin-001-aaaaaaaa"),
            role: UserRole::Admin,
        };

        assert!(doctor.may_manage(&UserId::from_db("doctor-001-aaaaaaaa")));
        assert!(!doctor.may_manage(&UserId::from_db("staff-001-aaaaaaaa")));
        assert!(admin.may_manage(&UserId::from_db("staff-001-aaaaaaaa")));
    }
}
