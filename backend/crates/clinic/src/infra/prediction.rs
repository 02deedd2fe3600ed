//! HTTP client for the external scoring service

use std::time::Duration;

use serde::Deserialize;

use crate::domain::service::{PredictionError, PredictionOutcome, PredictionService};
use crate::domain::value_object::AssessmentFeatures;

pub const DEFAULT_PREDICTION_URL: &str = "http://localhost:8000/predict";
pub const PREDICTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Response body of the scoring service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictResponse {
    result_label: String,
    probability_score: f64,
}

/// POSTs features as JSON to one configured endpoint.
///
/// Holds one pooled `reqwest::Client`; clone the `Arc` around it rather than
/// building a client per request.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, PredictionError> {
        Self::with_timeout(endpoint, PREDICTION_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictionService for HttpPredictionClient {
    async fn predict(
        &self,
        features: &AssessmentFeatures,
    ) -> Result<PredictionOutcome, PredictionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(features)
            .send()
            .await
            .map_err(|e| PredictionError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PredictionError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "Prediction service returned an error"
            );
            return Err(PredictionError::Upstream {
                status: status.as_u16(),
            });
        }

        let parsed: PredictResponse = serde_json::from_slice(&body)
            .map_err(|e| PredictionError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            result_label = %parsed.result_label,
            probability_score = parsed.probability_score,
            "Prediction received"
        );

        Ok(PredictionOutcome {
            label: parsed.result_label,
            probability: parsed.probability_score,
        })
    }
}
