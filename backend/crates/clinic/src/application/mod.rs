//! Application Layer
//!
//! Use cases for patients, appointments, medical records, assessments and
//! predictions.

pub mod appointments;
pub mod assessments;
pub mod medical_records;
pub mod patients;
pub mod predictions;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ClinicError, ClinicResult};

pub use appointments::{AppointmentUseCase, CreateAppointmentInput, UpdateAppointmentInput};
pub use assessments::{AssessmentInput, AssessmentUseCase};
pub use medical_records::{MedicalRecordInput, MedicalRecordUseCase};
pub use patients::{CreatePatientInput, PatientUseCase, UpdatePatientInput};
pub use predictions::{PredictionUseCase, UpdatePredictionInput};

/// One field changed by an update, echoed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatedField {
    pub field: &'static str,
    pub value: Value,
}

impl UpdatedField {
    pub fn new(field: &'static str, value: impl Into<Value>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Trimmed value of a mandatory text field.
pub(crate) fn required(field: &str, raw: String) -> ClinicResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClinicError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value of an optional text field; blank counts as absent.
pub(crate) fn present(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("nik", "  123 ".into()).unwrap(), "123");
        let err = required("fullName", "   ".into()).unwrap_err();
        assert_eq!(err.to_string(), "fullName is required");
    }

    #[test]
    fn test_present_drops_blank() {
        assert_eq!(present(Some(" ".into())), None);
        assert_eq!(present(Some(" x ".into())), Some("x".to_string()));
        assert_eq!(present(None), None);
    }
}
