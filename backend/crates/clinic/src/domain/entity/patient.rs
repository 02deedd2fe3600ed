//! Patient Entity

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::value_object::{gender::Gender, record_id::PatientId};

/// A registered patient. `nik` is unique among live patients.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: PatientId,
    pub full_name: String,
    /// National identity number
    pub nik: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    pub emergency_contact: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a patient
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub full_name: String,
    pub nik: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    pub emergency_contact: String,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PatientChanges {
    pub full_name: Option<String>,
    pub nik: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Short form embedded in appointment, record and assessment views
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSummary {
    pub id: PatientId,
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
}

impl Patient {
    pub fn new(id: PatientId, fields: NewPatient) -> Self {
        let now = Utc::now();

        Self {
            id,
            full_name: fields.full_name,
            nik: fields.nik,
            birth_date: fields.birth_date,
            gender: fields.gender,
            phone: fields.phone,
            address: fields.address,
            emergency_contact: fields.emergency_contact,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: PatientChanges) {
        if let Some(v) = changes.full_name {
            self.full_name = v;
        }
        if let Some(v) = changes.nik {
            self.nik = v;
        }
        if let Some(v) = changes.birth_date {
            self.birth_date = v;
        }
        if let Some(v) = changes.gender {
            self.gender = v;
        }
        if let Some(v) = changes.phone {
            self.phone = v;
        }
        if let Some(v) = changes.address {
            self.address = v;
        }
        if let Some(v) = changes.emergency_contact {
            self.emergency_contact = v;
        }
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> PatientSummary {
        PatientSummary {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            gender: self.gender,
            birth_date: self.birth_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_untouched_fields() {
        let mut patient = Patient::new(
            PatientId::from_db("patient-001-aaaaaaaa"),
            NewPatient {
                full_name: "Andi Saputra".into(),
                nik: "3201012345678900".into(),
                birth_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                gender: Gender::Male,
                phone: "08123456789".into(),
                address: "Jl. Merdeka No. 10".into(),
                emergency_contact: "08198765432".into(),
            },
        );

        patient.apply(PatientChanges {
            phone: Some("0811111111".into()),
            ..Default::default()
        });

        assert_eq!(patient.phone, "0811111111");
        assert_eq!(patient.nik, "3201012345678900");
        assert_eq!(patient.summary().full_name, "Andi Saputra");
    }
}
