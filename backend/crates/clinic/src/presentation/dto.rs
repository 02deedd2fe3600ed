//! API DTOs (Data Transfer Objects)

use auth::models::UserRole;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::application::UpdatedField;
use crate::domain::entity::{
    AppointmentView, Assessment, AssessmentView, MedicalRecordView, Patient, PatientSummary,
    Prediction, StaffSummary,
};
use crate::domain::value_object::{AppointmentStatus, Gender};

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Acknowledgement of a diffing update
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedFieldsResponse {
    pub message: &'static str,
    /// `{field, value}` pairs that changed
    #[schema(value_type = Vec<Object>)]
    pub updated_fields: Vec<UpdatedField>,
}

// ============================================================================
// Embedded summaries
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientBrief {
    pub id: String,
    pub full_name: String,
    #[schema(value_type = String, example = "female")]
    pub gender: Gender,
    pub birth_date: NaiveDate,
}

impl From<PatientSummary> for PatientBrief {
    fn from(p: PatientSummary) -> Self {
        Self {
            id: p.id.to_string(),
            full_name: p.full_name,
            gender: p.gender,
            birth_date: p.birth_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffBrief {
    pub id: String,
    pub full_name: String,
    #[schema(value_type = String, example = "doctor")]
    pub role: UserRole,
    pub email: String,
}

impl From<StaffSummary> for StaffBrief {
    fn from(s: StaffSummary) -> Self {
        Self {
            id: s.id.to_string(),
            full_name: s.full_name,
            role: s.role,
            email: s.email,
        }
    }
}

// ============================================================================
// Patients
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub nik: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub emergency_contact: String,
}

/// Partial update. Absent or blank fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub full_name: Option<String>,
    pub nik: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: String,
    pub full_name: String,
    pub nik: String,
    pub birth_date: NaiveDate,
    #[schema(value_type = String, example = "female")]
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    pub emergency_contact: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponse {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id.to_string(),
            full_name: p.full_name,
            nik: p.nik,
            birth_date: p.birth_date,
            gender: p.gender,
            phone: p.phone,
            address: p.address,
            emergency_contact: p.emergency_contact,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatePatientResponse {
    pub message: &'static str,
    pub patient: PatientResponse,
}

/// `gender` filter of the patient list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientListQuery {
    pub gender: Option<String>,
}

// ============================================================================
// Appointments
// ============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub user_id: String,
    pub schedule_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub schedule_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AppointmentStatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: String,
    pub patient_id: String,
    pub user_id: String,
    pub schedule_at: DateTime<Utc>,
    #[schema(value_type = String, example = "pending")]
    pub status: AppointmentStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient: PatientBrief,
    pub user: StaffBrief,
}

impl From<AppointmentView> for AppointmentResponse {
    fn from(view: AppointmentView) -> Self {
        let a = view.appointment;
        Self {
            id: a.id.to_string(),
            patient_id: a.patient_id.to_string(),
            user_id: a.user_id.to_string(),
            schedule_at: a.schedule_at,
            status: a.status,
            notes: a.notes,
            created_at: a.created_at,
            updated_at: a.updated_at,
            patient: view.patient.into(),
            user: view.user.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateAppointmentResponse {
    pub message: &'static str,
    pub appointment: AppointmentResponse,
}

/// Filters of the appointment list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListQuery {
    pub status: Option<String>,
    pub patient_id: Option<String>,
    pub user_id: Option<String>,
}

// ============================================================================
// Medical Records
// ============================================================================

/// Create and update body. Updates replace every field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordRequest {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub treatment: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatient {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordAuthor {
    pub id: String,
    pub full_name: String,
    #[schema(value_type = String, example = "doctor")]
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordResponse {
    pub id: String,
    pub patient_id: String,
    pub user_id: String,
    pub diagnosis: String,
    pub treatment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient: RecordPatient,
    pub user: RecordAuthor,
}

impl From<MedicalRecordView> for MedicalRecordResponse {
    fn from(view: MedicalRecordView) -> Self {
        let r = view.record;
        Self {
            id: r.id.to_string(),
            patient_id: r.patient_id.to_string(),
            user_id: r.user_id.to_string(),
            diagnosis: r.diagnosis,
            treatment: r.treatment,
            created_at: r.created_at,
            updated_at: r.updated_at,
            patient: RecordPatient {
                id: view.patient.id.to_string(),
                full_name: view.patient.full_name,
            },
            user: RecordAuthor {
                id: view.user.id.to_string(),
                full_name: view.user.full_name,
                role: view.user.role,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicalRecordResponse {
    pub message: &'static str,
    pub medical_record: MedicalRecordResponse,
}

/// Filters of the medical record list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordListQuery {
    pub patient_id: Option<String>,
    pub user_id: Option<String>,
}

// ============================================================================
// Assessments
// ============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    #[serde(default)]
    pub patient_id: String,
    pub date: DateTime<Utc>,
    /// Questionnaire answers keyed by feature name
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub answers: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAssessmentRequest {
    pub date: DateTime<Utc>,
    /// Questionnaire answers keyed by feature name
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub answers: Option<Value>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub id: String,
    pub patient_id: String,
    pub date: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub answers: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient: PatientBrief,
    /// Latest prediction, `null` until the assessment is scored
    pub prediction: Option<PredictionResponse>,
}

impl From<AssessmentView> for AssessmentResponse {
    fn from(view: AssessmentView) -> Self {
        let s = view.assessment;
        Self {
            id: s.id.to_string(),
            patient_id: s.patient_id.to_string(),
            date: s.date,
            answers: s.answers,
            created_at: s.created_at,
            updated_at: s.updated_at,
            patient: view.patient.into(),
            prediction: view.prediction.map(PredictionResponse::from),
        }
    }
}

/// `{data: ...}` envelope of a single assessment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssessmentData {
    pub data: AssessmentResponse,
}

/// `{data: [...]}` envelope of a patient's assessments
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssessmentListData {
    pub data: Vec<AssessmentResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateAssessmentResponse {
    pub message: &'static str,
    pub data: AssessmentResponse,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedAssessment {
    pub id: String,
    pub date: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub answers: Value,
    pub updated_at: DateTime<Utc>,
}

impl From<Assessment> for UpdatedAssessment {
    fn from(s: Assessment) -> Self {
        Self {
            id: s.id.to_string(),
            date: s.date,
            answers: s.answers,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateAssessmentResponse {
    pub message: &'static str,
    pub data: UpdatedAssessment,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentListQuery {
    pub patient_id: Option<String>,
}

// ============================================================================
// Predictions
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub id: String,
    pub assessment_id: String,
    pub result_label: String,
    pub probability_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Prediction> for PredictionResponse {
    fn from(p: Prediction) -> Self {
        Self {
            id: p.id.to_string(),
            assessment_id: p.assessment_id.to_string(),
            result_label: p.result_label,
            probability_score: p.probability_score,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePredictionRequest {
    #[serde(default)]
    pub result_label: String,
    pub probability_score: f64,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PredictionListQuery {
    pub result_label: Option<String>,
}
