//! Assessment Use Case

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::pagination::{PageRequest, Paginated};
use serde_json::{Map, Value};

use crate::application::required;
use crate::domain::entity::{Assessment, AssessmentView};
use crate::domain::repository::{
    AssessmentFilter, AssessmentRepository, AssessmentSortField, PatientRepository,
};
use crate::domain::value_object::{AssessmentId, PatientId};
use crate::error::{ClinicError, ClinicResult};

/// Create input. `patient_id` is ignored on update.
#[derive(Debug, Clone)]
pub struct AssessmentInput {
    pub patient_id: String,
    pub date: DateTime<Utc>,
    /// Absent or `null` is stored as `{}`
    pub answers: Option<Value>,
}

pub struct AssessmentUseCase<R>
where
    R: AssessmentRepository + PatientRepository,
{
    repo: Arc<R>,
}

impl<R> AssessmentUseCase<R>
where
    R: AssessmentRepository + PatientRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: AssessmentInput) -> ClinicResult<AssessmentView> {
        let patient_id = PatientId::from_db(required("patientId", input.patient_id)?);
        let answers = answers_object(input.answers)?;

        let patient = self
            .repo
            .find_patient(&patient_id)
            .await?
            .ok_or_else(|| ClinicError::validation("Patient not found"))?;

        let sequence = self.repo.next_assessment_sequence().await?;
        let assessment = Assessment::new(
            AssessmentId::generate(sequence),
            patient_id,
            input.date,
            answers,
        );
        self.repo.create_assessment(&assessment).await?;

        tracing::info!(assessment_id = %assessment.id, patient_id = %assessment.patient_id, "Assessment created");

        Ok(AssessmentView {
            assessment,
            patient: patient.summary(),
            prediction: None,
        })
    }

    pub async fn list(
        &self,
        filter: AssessmentFilter,
        page: PageRequest<AssessmentSortField>,
    ) -> ClinicResult<Paginated<AssessmentView>> {
        self.repo.list_assessments(&filter, &page).await
    }

    pub async fn get(&self, id: &AssessmentId) -> ClinicResult<AssessmentView> {
        self.repo
            .find_assessment(id)
            .await?
            .ok_or(ClinicError::NotFound("Assessment not found"))
    }

    pub async fn list_by_patient(&self, patient_id: &PatientId) -> ClinicResult<Vec<AssessmentView>> {
        self.repo.find_assessments_by_patient(patient_id).await
    }

    /// Replace date and answers.
    pub async fn update(
        &self,
        id: &AssessmentId,
        date: DateTime<Utc>,
        answers: Option<Value>,
    ) -> ClinicResult<Assessment> {
        let mut assessment = self.get(id).await?.assessment;

        assessment.date = date;
        assessment.answers = answers_object(answers)?;
        assessment.updated_at = Utc::now();
        self.repo.update_assessment(&assessment).await?;

        tracing::info!(assessment_id = %assessment.id, "Assessment updated");

        Ok(assessment)
    }

    pub async fn delete(&self, id: &AssessmentId) -> ClinicResult<()> {
        if !self.repo.soft_delete_assessment(id).await? {
            return Err(ClinicError::NotFound("Assessment not found"));
        }

        tracing::info!(assessment_id = %id, "Assessment deleted");
        Ok(())
    }
}

fn answers_object(answers: Option<Value>) -> ClinicResult<Value> {
    match answers {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(value @ Value::Object(_)) => Ok(value),
        Some(_) => Err(ClinicError::validation("answers must be a JSON object")),
    }
}
