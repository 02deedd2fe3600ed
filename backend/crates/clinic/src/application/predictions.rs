//! Prediction Use Case
//!
//! Scores an assessment through the external prediction service and keeps
//! the result.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::PredictionId;
use kernel::pagination::{PageRequest, Paginated};
use uuid::Uuid;

use crate::domain::entity::Prediction;
use crate::domain::repository::{
    AssessmentRepository, PredictionFilter, PredictionRepository, PredictionSortField,
};
use crate::domain::service::PredictionService;
use crate::domain::value_object::{AssessmentFeatures, AssessmentId};
use crate::error::{ClinicError, ClinicResult};

const NOT_FOUND: &str = "Prediction not found";

/// Manual correction of a stored prediction
#[derive(Debug, Clone)]
pub struct UpdatePredictionInput {
    pub result_label: String,
    pub probability_score: f64,
}

pub struct PredictionUseCase<R, P>
where
    R: PredictionRepository + AssessmentRepository,
    P: PredictionService,
{
    repo: Arc<R>,
    predictor: Arc<P>,
}

impl<R, P> PredictionUseCase<R, P>
where
    R: PredictionRepository + AssessmentRepository,
    P: PredictionService,
{
    pub fn new(repo: Arc<R>, predictor: Arc<P>) -> Self {
        Self { repo, predictor }
    }

    /// Score the assessment and store a new prediction. Not idempotent.
    pub async fn predict(&self, assessment_id: &AssessmentId) -> ClinicResult<Prediction> {
        let view = self
            .repo
            .find_assessment(assessment_id)
            .await?
            .ok_or(ClinicError::NotFound("Assessment not found"))?;

        let features = AssessmentFeatures::from_answers(&view.assessment.answers)
            .map_err(ClinicError::InvalidAnswers)?;

        let outcome = self.predictor.predict(&features).await?;

        let prediction = Prediction::new(view.assessment.id, outcome.label, outcome.probability);
        self.repo.create_prediction(&prediction).await?;

        tracing::info!(
            prediction_id = %prediction.id,
            assessment_id = %prediction.assessment_id,
            result_label = %prediction.result_label,
            "Prediction stored"
        );

        Ok(prediction)
    }

    pub async fn list(
        &self,
        filter: PredictionFilter,
        page: PageRequest<PredictionSortField>,
    ) -> ClinicResult<Paginated<Prediction>> {
        self.repo.list_predictions(&filter, &page).await
    }

    pub async fn get(&self, raw_id: &str) -> ClinicResult<Prediction> {
        let id = parse_prediction_id(raw_id)?;
        self.repo
            .find_prediction(&id)
            .await?
            .ok_or(ClinicError::NotFound(NOT_FOUND))
    }

    pub async fn get_by_assessment(&self, assessment_id: &AssessmentId) -> ClinicResult<Prediction> {
        self.repo
            .find_prediction_by_assessment(assessment_id)
            .await?
            .ok_or(ClinicError::NotFound("Prediction for this assessment not found"))
    }

    pub async fn update(&self, raw_id: &str, input: UpdatePredictionInput) -> ClinicResult<Prediction> {
        let result_label = input.result_label.trim();
        if result_label.is_empty() {
            return Err(ClinicError::validation("resultLabel is required"));
        }
        if !(0.0..=1.0).contains(&input.probability_score) {
            return Err(ClinicError::validation("probabilityScore must be between 0 and 1"));
        }

        let mut prediction = self.get(raw_id).await?;
        prediction.result_label = result_label.to_string();
        prediction.probability_score = input.probability_score;
        prediction.updated_at = Utc::now();
        self.repo.update_prediction(&prediction).await?;

        tracing::info!(prediction_id = %prediction.id, "Prediction corrected");

        Ok(prediction)
    }

    pub async fn delete(&self, raw_id: &str) -> ClinicResult<()> {
        let id = parse_prediction_id(raw_id)?;
        if !self.repo.soft_delete_prediction(&id).await? {
            return Err(ClinicError::NotFound(NOT_FOUND));
        }

        tracing::info!(prediction_id = %id, "Prediction deleted");
        Ok(())
    }
}

/// A malformed id cannot name a stored prediction.
fn parse_prediction_id(raw: &str) -> ClinicResult<PredictionId> {
    Uuid::parse_str(raw.trim())
        .map(PredictionId::from_uuid)
        .map_err(|_| ClinicError::NotFound(NOT_FOUND))
}
