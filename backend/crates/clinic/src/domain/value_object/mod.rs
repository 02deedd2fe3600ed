//! Value Object Module

pub mod appointment_status;
pub mod assessment_features;
pub mod gender;
pub mod record_id;

pub use appointment_status::AppointmentStatus;
pub use assessment_features::AssessmentFeatures;
pub use gender::Gender;
pub use record_id::{AppointmentId, AssessmentId, MedicalRecordId, PatientId};
