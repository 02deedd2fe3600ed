use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Staff role. Stored and transmitted as its lowercase code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[display("admin")]
    Admin,
    #[display("doctor")]
    Doctor,
    #[display("staff")]
    Staff,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Doctor, UserRole::Staff];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "admin",
            Doctor => "doctor",
            Staff => "staff",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "admin" => Some(Admin),
            "doctor" => Some(Doctor),
            "staff" => Some(Staff),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Prefix for generated user ids (`doctor-007-xxxxxxxx`)
    #[inline]
    pub const fn id_prefix(&self) -> &'static str {
        self.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("doctor"), Some(UserRole::Doctor));
        assert_eq!(UserRole::from_code("staff"), Some(UserRole::Staff));
        assert_eq!(UserRole::from_code("nurse"), None);
        assert_eq!(UserRole::from_code("Admin"), None);
    }

    #[test]
    fn test_user_role_display_matches_code() {
        for role in UserRole::ALL {
            assert_eq!(role.to_string(), role.code());
        }
    }

    #[test]
    fn test_user_role_serde() {
        assert_eq!(serde_json::to_string(&UserRole::Doctor).unwrap(), "\"doctor\"");
        let role: UserRole = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, UserRole::Staff);
        assert!(serde_json::from_str::<UserRole>("\"superuser\"").is_err());
    }
}
