//! Patient Use Case

use std::sync::Arc;

use chrono::NaiveDate;
use kernel::pagination::{PageRequest, Paginated};

use crate::application::{present, required};
use crate::domain::entity::{NewPatient, Patient, PatientChanges};
use crate::domain::repository::{PatientFilter, PatientRepository, PatientSortField};
use crate::domain::value_object::{Gender, PatientId};
use crate::error::{ClinicError, ClinicResult};

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Register input. Every field is mandatory.
#[derive(Debug, Clone, Default)]
pub struct CreatePatientInput {
    pub full_name: String,
    pub nik: String,
    pub birth_date: String,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub emergency_contact: String,
}

/// Update input. Absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePatientInput {
    pub full_name: Option<String>,
    pub nik: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
}

pub struct PatientUseCase<R>
where
    R: PatientRepository,
{
    repo: Arc<R>,
}

impl<R> PatientUseCase<R>
where
    R: PatientRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreatePatientInput) -> ClinicResult<Patient> {
        let fields = NewPatient {
            full_name: required("fullName", input.full_name)?,
            nik: required("nik", input.nik)?,
            birth_date: parse_birth_date(&required("birthDate", input.birth_date)?)?,
            gender: parse_gender(&required("gender", input.gender)?)?,
            phone: required("phone", input.phone)?,
            address: required("address", input.address)?,
            emergency_contact: required("emergencyContact", input.emergency_contact)?,
        };

        if self.repo.nik_exists(&fields.nik, None).await? {
            return Err(ClinicError::NikTaken("NIK already registered"));
        }

        let sequence = self.repo.next_patient_sequence().await?;
        let patient = Patient::new(PatientId::generate(sequence), fields);
        self.repo.create_patient(&patient).await?;

        tracing::info!(patient_id = %patient.id, "Patient registered");

        Ok(patient)
    }

    pub async fn list(
        &self,
        filter: PatientFilter,
        page: PageRequest<PatientSortField>,
    ) -> ClinicResult<Paginated<Patient>> {
        self.repo.list_patients(&filter, &page).await
    }

    pub async fn get(&self, id: &PatientId) -> ClinicResult<Patient> {
        self.repo
            .find_patient(id)
            .await?
            .ok_or(ClinicError::NotFound("Patient not found"))
    }

    pub async fn update(&self, id: &PatientId, input: UpdatePatientInput) -> ClinicResult<Patient> {
        let mut patient = self.get(id).await?;

        let mut changes = PatientChanges {
            full_name: present(input.full_name),
            phone: present(input.phone),
            address: present(input.address),
            emergency_contact: present(input.emergency_contact),
            ..Default::default()
        };

        if let Some(raw) = present(input.birth_date) {
            changes.birth_date = Some(parse_birth_date(&raw)?);
        }
        if let Some(raw) = present(input.gender) {
            changes.gender = Some(parse_gender(&raw)?);
        }
        if let Some(nik) = present(input.nik) {
            if nik != patient.nik {
                if self.repo.nik_exists(&nik, Some(id)).await? {
                    return Err(ClinicError::NikTaken("NIK already used"));
                }
                changes.nik = Some(nik);
            }
        }

        patient.apply(changes);
        self.repo.update_patient(&patient).await?;

        tracing::info!(patient_id = %patient.id, "Patient updated");

        Ok(patient)
    }

    pub async fn delete(&self, id: &PatientId) -> ClinicResult<()> {
        if !self.repo.soft_delete_patient(id).await? {
            return Err(ClinicError::NotFound("Patient not found"));
        }

        tracing::info!(patient_id = %id, "Patient deleted");
        Ok(())
    }
}

fn parse_birth_date(raw: &str) -> ClinicResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT)
        .map_err(|_| ClinicError::validation("birthDate must be a date in YYYY-MM-DD format"))
}

pub(crate) fn parse_gender(raw: &str) -> ClinicResult<Gender> {
    Gender::from_code(raw)
        .ok_or_else(|| ClinicError::validation("Gender must be one of male, female, other"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(
            parse_birth_date("2000-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 31).unwrap()
        );
        assert!(parse_birth_date("31-01-2000").is_err());
        assert!(parse_birth_date("2000-02-30").is_err());
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender("female").unwrap(), Gender::Female);
        assert!(matches!(parse_gender("x"), Err(ClinicError::Validation(_))));
    }
}
