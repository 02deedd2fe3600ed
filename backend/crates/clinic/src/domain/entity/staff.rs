//! Clinic staff as seen from clinic records

use auth::models::{UserId, UserRole};

/// Short form of the user an appointment or record is assigned to
#[derive(Debug, Clone, PartialEq)]
pub struct StaffSummary {
    pub id: UserId,
    pub full_name: String,
    pub role: UserRole,
    pub email: String,
}
