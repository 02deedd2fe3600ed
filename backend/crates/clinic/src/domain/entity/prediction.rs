//! Prediction Entity

use chrono::{DateTime, Utc};
use kernel::id::PredictionId;

use crate::domain::value_object::record_id::AssessmentId;

/// Stored scoring result for one assessment.
///
/// Scoring the same assessment again stores another prediction; reads by
/// assessment return the newest one.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub id: PredictionId,
    pub assessment_id: AssessmentId,
    pub result_label: String,
    pub probability_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prediction {
    pub fn new(assessment_id: AssessmentId, result_label: String, probability_score: f64) -> Self {
        let now = Utc::now();

        Self {
            id: PredictionId::new(),
            assessment_id,
            result_label,
            probability_score,
            created_at: now,
            updated_at: now,
        }
    }
}
