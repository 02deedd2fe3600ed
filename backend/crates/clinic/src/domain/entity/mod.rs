//! Entity Module

pub mod appointment;
pub mod assessment;
pub mod medical_record;
pub mod patient;
pub mod prediction;
pub mod staff;

pub use appointment::{Appointment, AppointmentView};
pub use assessment::{Assessment, AssessmentView};
pub use medical_record::{MedicalRecord, MedicalRecordView};
pub use patient::{NewPatient, Patient, PatientChanges, PatientSummary};
pub use prediction::Prediction;
pub use staff::StaffSummary;
