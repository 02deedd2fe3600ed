//! Appointment Use Case

use std::sync::Arc;

use auth::models::UserId;
use chrono::{DateTime, SecondsFormat, Utc};
use kernel::pagination::{PageRequest, Paginated};

use crate::application::{UpdatedField, required};
use crate::domain::entity::{Appointment, AppointmentView};
use crate::domain::repository::{
    AppointmentFilter, AppointmentRepository, AppointmentSortField, PatientRepository,
    StaffDirectory,
};
use crate::domain::value_object::{AppointmentId, AppointmentStatus, PatientId};
use crate::error::{ClinicError, ClinicResult};

#[derive(Debug, Clone)]
pub struct CreateAppointmentInput {
    pub patient_id: String,
    pub user_id: String,
    pub schedule_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Reschedule and/or re-annotate. At least one field must be set.
#[derive(Debug, Clone, Default)]
pub struct UpdateAppointmentInput {
    pub schedule_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub struct AppointmentUseCase<R>
where
    R: AppointmentRepository + PatientRepository + StaffDirectory,
{
    repo: Arc<R>,
}

impl<R> AppointmentUseCase<R>
where
    R: AppointmentRepository + PatientRepository + StaffDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateAppointmentInput) -> ClinicResult<AppointmentView> {
        let patient_id = PatientId::from_db(required("patientId", input.patient_id)?);
        let user_id = UserId::from_db(required("userId", input.user_id)?);

        let patient = self
            .repo
            .find_patient(&patient_id)
            .await?
            .ok_or_else(|| ClinicError::validation("Patient not found"))?;
        let user = self
            .repo
            .find_staff(&user_id)
            .await?
            .ok_or_else(|| ClinicError::validation("User not found"))?;

        let sequence = self.repo.next_appointment_sequence().await?;
        let appointment = Appointment::new(
            AppointmentId::generate(sequence),
            patient_id,
            user_id,
            input.schedule_at,
            input.notes.unwrap_or_default(),
        );
        self.repo.create_appointment(&appointment).await?;

        tracing::info!(
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            user_id = %appointment.user_id,
            "Appointment created"
        );

        Ok(AppointmentView {
            appointment,
            patient: patient.summary(),
            user,
        })
    }

    pub async fn list(
        &self,
        filter: AppointmentFilter,
        page: PageRequest<AppointmentSortField>,
    ) -> ClinicResult<Paginated<AppointmentView>> {
        self.repo.list_appointments(&filter, &page).await
    }

    pub async fn get(&self, id: &AppointmentId) -> ClinicResult<AppointmentView> {
        self.repo
            .find_appointment(id)
            .await?
            .ok_or(ClinicError::NotFound("Appointment not found"))
    }

    pub async fn list_by_patient(&self, patient_id: PatientId) -> ClinicResult<Vec<AppointmentView>> {
        self.repo
            .find_appointments(&AppointmentFilter {
                patient_id: Some(patient_id),
                ..Default::default()
            })
            .await
    }

    pub async fn list_by_user(&self, user_id: UserId) -> ClinicResult<Vec<AppointmentView>> {
        self.repo
            .find_appointments(&AppointmentFilter {
                user_id: Some(user_id),
                ..Default::default()
            })
            .await
    }

    /// Returns the fields that were set, in request order.
    pub async fn update(
        &self,
        id: &AppointmentId,
        input: UpdateAppointmentInput,
    ) -> ClinicResult<Vec<UpdatedField>> {
        let mut appointment = self.get(id).await?.appointment;
        let mut updated = Vec::new();

        if let Some(schedule_at) = input.schedule_at {
            appointment.schedule_at = schedule_at;
            updated.push(UpdatedField::new(
                "scheduleAt",
                schedule_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ));
        }
        if let Some(notes) = input.notes {
            updated.push(UpdatedField::new("notes", notes.clone()));
            appointment.notes = notes;
        }

        if updated.is_empty() {
            return Err(ClinicError::validation("No fields to update"));
        }

        appointment.updated_at = Utc::now();
        self.repo.update_appointment(&appointment).await?;

        tracing::info!(appointment_id = %appointment.id, fields = updated.len(), "Appointment updated");

        Ok(updated)
    }

    pub async fn change_status(&self, id: &AppointmentId, raw_status: &str) -> ClinicResult<()> {
        let status = AppointmentStatus::from_code(raw_status.trim()).ok_or_else(|| {
            ClinicError::validation("Status must be one of pending, done, cancelled")
        })?;

        let mut appointment = self.get(id).await?.appointment;
        appointment.status = status;
        appointment.updated_at = Utc::now();
        self.repo.update_appointment(&appointment).await?;

        tracing::info!(appointment_id = %appointment.id, status = %status, "Appointment status changed");

        Ok(())
    }

    pub async fn delete(&self, id: &AppointmentId) -> ClinicResult<()> {
        if !self.repo.soft_delete_appointment(id).await? {
            return Err(ClinicError::NotFound("Appointment not found"));
        }

        tracing::info!(appointment_id = %id, "Appointment deleted");
        Ok(())
    }
}
