//! Medical Record Use Case

use std::sync::Arc;

use auth::models::UserId;
use chrono::Utc;
use kernel::pagination::{PageRequest, Paginated};

use crate::application::{UpdatedField, required};
use crate::domain::entity::{MedicalRecord, MedicalRecordView, PatientSummary, StaffSummary};
use crate::domain::repository::{
    MedicalRecordFilter, MedicalRecordRepository, MedicalRecordSortField, PatientRepository,
    StaffDirectory,
};
use crate::domain::value_object::{MedicalRecordId, PatientId};
use crate::error::{ClinicError, ClinicResult};

/// Create and update input. Updates replace every field.
#[derive(Debug, Clone, Default)]
pub struct MedicalRecordInput {
    pub patient_id: String,
    pub user_id: String,
    pub diagnosis: String,
    pub treatment: String,
}

struct ValidRecordInput {
    patient_id: PatientId,
    user_id: UserId,
    diagnosis: String,
    treatment: String,
}

impl MedicalRecordInput {
    fn validate(self) -> ClinicResult<ValidRecordInput> {
        Ok(ValidRecordInput {
            patient_id: PatientId::from_db(required("patientId", self.patient_id)?),
            user_id: UserId::from_db(required("userId", self.user_id)?),
            diagnosis: required("diagnosis", self.diagnosis)?,
            treatment: required("treatment", self.treatment)?,
        })
    }
}

pub struct MedicalRecordUseCase<R>
where
    R: MedicalRecordRepository + PatientRepository + StaffDirectory,
{
    repo: Arc<R>,
}

impl<R> MedicalRecordUseCase<R>
where
    R: MedicalRecordRepository + PatientRepository + StaffDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: MedicalRecordInput) -> ClinicResult<MedicalRecordView> {
        let input = input.validate()?;
        let patient = self.patient_summary(&input.patient_id).await?;
        let user = self.staff(&input.user_id).await?;

        let sequence = self.repo.next_record_sequence().await?;
        let record = MedicalRecord::new(
            MedicalRecordId::generate(sequence),
            input.patient_id,
            input.user_id,
            input.diagnosis,
            input.treatment,
        );
        self.repo.create_record(&record).await?;

        tracing::info!(record_id = %record.id, patient_id = %record.patient_id, "Medical record created");

        Ok(MedicalRecordView {
            record,
            patient,
            user,
        })
    }

    pub async fn list(
        &self,
        filter: MedicalRecordFilter,
        page: PageRequest<MedicalRecordSortField>,
    ) -> ClinicResult<Paginated<MedicalRecordView>> {
        self.repo.list_records(&filter, &page).await
    }

    pub async fn get(&self, id: &MedicalRecordId) -> ClinicResult<MedicalRecordView> {
        self.repo
            .find_record(id)
            .await?
            .ok_or(ClinicError::NotFound("Medical record not found"))
    }

    /// Replace all fields; returns the ones whose value changed.
    pub async fn update(
        &self,
        id: &MedicalRecordId,
        input: MedicalRecordInput,
    ) -> ClinicResult<Vec<UpdatedField>> {
        let mut record = self.get(id).await?.record;
        let input = input.validate()?;
        let mut updated = Vec::new();

        if input.patient_id != record.patient_id {
            self.patient_summary(&input.patient_id).await?;
            updated.push(UpdatedField::new("patientId", input.patient_id.to_string()));
            record.patient_id = input.patient_id;
        }
        if input.user_id != record.user_id {
            self.staff(&input.user_id).await?;
            updated.push(UpdatedField::new("userId", input.user_id.to_string()));
            record.user_id = input.user_id;
        }
        if input.diagnosis != record.diagnosis {
            updated.push(UpdatedField::new("diagnosis", input.diagnosis.clone()));
            record.diagnosis = input.diagnosis;
        }
        if input.treatment != record.treatment {
            updated.push(UpdatedField::new("treatment", input.treatment.clone()));
            record.treatment = input.treatment;
        }

        if updated.is_empty() {
            return Err(ClinicError::validation("No fields to update"));
        }

        record.updated_at = Utc::now();
        self.repo.update_record(&record).await?;

        tracing::info!(record_id = %record.id, fields = updated.len(), "Medical record updated");

        Ok(updated)
    }

    pub async fn delete(&self, id: &MedicalRecordId) -> ClinicResult<()> {
        if !self.repo.soft_delete_record(id).await? {
            return Err(ClinicError::NotFound("Medical record not found"));
        }

        tracing::info!(record_id = %id, "Medical record deleted");
        Ok(())
    }

    async fn patient_summary(&self, id: &PatientId) -> ClinicResult<PatientSummary> {
        self.repo
            .find_patient(id)
            .await?
            .map(|p| p.summary())
            .ok_or_else(|| ClinicError::validation("Patient not found"))
    }

    async fn staff(&self, id: &UserId) -> ClinicResult<StaffSummary> {
        self.repo
            .find_staff(id)
            .await?
            .ok_or_else(|| ClinicError::validation("User not found"))
    }
}
