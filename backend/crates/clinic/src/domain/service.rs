//! Prediction Service
//!
//! The scoring model runs outside this process. The domain only knows this
//! trait; `infra::prediction` provides the HTTP implementation.

use thiserror::Error;

use crate::domain::value_object::AssessmentFeatures;

/// What the scoring service answered
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub label: String,
    /// Passed through as received; not range-checked.
    pub probability: f64,
}

#[derive(Debug, Error)]
pub enum PredictionError {
    /// Connection failure or timeout
    #[error("Failed to reach prediction service")]
    Unreachable(String),

    #[error("Prediction service returned an error status")]
    Upstream { status: u16 },

    /// Body was not the expected JSON
    #[error("Failed to read prediction result")]
    InvalidResponse(String),
}

#[trait_variant::make(PredictionService: Send)]
pub trait LocalPredictionService {
    async fn predict(
        &self,
        features: &AssessmentFeatures,
    ) -> Result<PredictionOutcome, PredictionError>;
}
