//! Appointment Entity

use auth::models::UserId;
use chrono::{DateTime, Utc};

use crate::domain::entity::{patient::PatientSummary, staff::StaffSummary};
use crate::domain::value_object::{
    appointment_status::AppointmentStatus,
    record_id::{AppointmentId, PatientId},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    /// Doctor or staff member the patient is booked with
    pub user_id: UserId,
    pub schedule_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        id: AppointmentId,
        patient_id: PatientId,
        user_id: UserId,
        schedule_at: DateTime<Utc>,
        notes: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            patient_id,
            user_id,
            schedule_at,
            status: AppointmentStatus::Pending,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Appointment joined with its patient and assigned user
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentView {
    pub appointment: Appointment,
    pub patient: PatientSummary,
    pub user: StaffSummary,
}
