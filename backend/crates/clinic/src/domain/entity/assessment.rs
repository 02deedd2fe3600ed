//! Assessment Entity

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::entity::{patient::PatientSummary, prediction::Prediction};
use crate::domain::value_object::record_id::{AssessmentId, PatientId};

/// Questionnaire answers taken on one date
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub id: AssessmentId,
    pub patient_id: PatientId,
    pub date: DateTime<Utc>,
    /// Free-form JSON object; see `AssessmentFeatures` for the keys scoring reads
    pub answers: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn new(id: AssessmentId, patient_id: PatientId, date: DateTime<Utc>, answers: Value) -> Self {
        let now = Utc::now();

        Self {
            id,
            patient_id,
            date,
            answers,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Assessment joined with its patient and latest prediction
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentView {
    pub assessment: Assessment,
    pub patient: PatientSummary,
    pub prediction: Option<Prediction>,
}
