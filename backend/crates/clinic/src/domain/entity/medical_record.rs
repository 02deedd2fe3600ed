//! Medical Record Entity

use auth::models::UserId;
use chrono::{DateTime, Utc};

use crate::domain::entity::{patient::PatientSummary, staff::StaffSummary};
use crate::domain::value_object::record_id::{MedicalRecordId, PatientId};

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecord {
    pub id: MedicalRecordId,
    pub patient_id: PatientId,
    /// Author of the record
    pub user_id: UserId,
    pub diagnosis: String,
    pub treatment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalRecord {
    pub fn new(
        id: MedicalRecordId,
        patient_id: PatientId,
        user_id: UserId,
        diagnosis: String,
        treatment: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            patient_id,
            user_id,
            diagnosis,
            treatment,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Medical record joined with its patient and author
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecordView {
    pub record: MedicalRecord,
    pub patient: PatientSummary,
    pub user: StaffSummary,
}
