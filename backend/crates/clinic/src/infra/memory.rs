//! In-memory clinic store
//!
//! Backs the router tests. Accounts are not owned here; seed them with
//! [`InMemoryClinicRepository::add_staff`].

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use auth::models::UserId;
use kernel::id::PredictionId;
use kernel::pagination::{PageRequest, Paginated, SortOrder};
use tokio::sync::RwLock;

use crate::domain::entity::{
    Appointment, AppointmentView, Assessment, AssessmentView, MedicalRecord, MedicalRecordView,
    Patient, PatientSummary, Prediction, StaffSummary,
};
use crate::domain::repository::{
    AppointmentFilter, AppointmentRepository, AppointmentSortField, AssessmentFilter,
    AssessmentRepository, AssessmentSortField, MedicalRecordFilter, MedicalRecordRepository,
    MedicalRecordSortField, PatientFilter, PatientRepository, PatientSortField, PredictionFilter,
    PredictionRepository, PredictionSortField, StaffDirectory,
};
use crate::domain::value_object::{AppointmentId, AssessmentId, MedicalRecordId, PatientId};
use crate::error::{ClinicError, ClinicResult};

/// Live rows plus the soft-deleted ones views may still point at
struct Table<K, V> {
    live: HashMap<K, V>,
    deleted: HashMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            live: HashMap::new(),
            deleted: HashMap::new(),
        }
    }
}

impl<K: std::hash::Hash + Eq + Clone, V: Clone> Table<K, V> {
    fn get_any(&self, key: &K) -> Option<&V> {
        self.live.get(key).or_else(|| self.deleted.get(key))
    }

    fn replace(&mut self, key: &K, value: &V) -> bool {
        match self.live.get_mut(key) {
            Some(slot) => {
                *slot = value.clone();
                true
            }
            None => false,
        }
    }

    fn soft_delete(&mut self, key: &K) -> bool {
        match self.live.remove(key) {
            Some(value) => {
                self.deleted.insert(key.clone(), value);
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
struct Sequences {
    patient: i64,
    appointment: i64,
    record: i64,
    assessment: i64,
}

fn bump(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
struct State {
    patients: Table<PatientId, Patient>,
    appointments: Table<AppointmentId, Appointment>,
    records: Table<MedicalRecordId, MedicalRecord>,
    assessments: Table<AssessmentId, Assessment>,
    predictions: Table<PredictionId, Prediction>,
    staff: HashMap<UserId, StaffSummary>,
    sequences: Sequences,
}

impl State {
    fn patient_summary(&self, id: &PatientId) -> ClinicResult<PatientSummary> {
        self.patients
            .get_any(id)
            .map(Patient::summary)
            .ok_or_else(|| ClinicError::Internal(format!("Dangling patient reference: {id}")))
    }

    fn staff(&self, id: &UserId) -> ClinicResult<StaffSummary> {
        self.staff
            .get(id)
            .cloned()
            .ok_or_else(|| ClinicError::Internal(format!("Dangling user reference: {id}")))
    }

    fn appointment_view(&self, appointment: &Appointment) -> ClinicResult<AppointmentView> {
        Ok(AppointmentView {
            patient: self.patient_summary(&appointment.patient_id)?,
            user: self.staff(&appointment.user_id)?,
            appointment: appointment.clone(),
        })
    }

    fn record_view(&self, record: &MedicalRecord) -> ClinicResult<MedicalRecordView> {
        Ok(MedicalRecordView {
            patient: self.patient_summary(&record.patient_id)?,
            user: self.staff(&record.user_id)?,
            record: record.clone(),
        })
    }

    fn latest_prediction(&self, assessment_id: &AssessmentId) -> Option<Prediction> {
        self.predictions
            .live
            .values()
            .filter(|p| &p.assessment_id == assessment_id)
            .max_by_key(|p| p.created_at)
            .cloned()
    }

    fn assessment_view(&self, assessment: &Assessment) -> ClinicResult<AssessmentView> {
        Ok(AssessmentView {
            patient: self.patient_summary(&assessment.patient_id)?,
            prediction: self.latest_prediction(&assessment.id),
            assessment: assessment.clone(),
        })
    }

    fn nik_in_use(&self, nik: &str, except: Option<&PatientId>) -> bool {
        self.patients
            .live
            .values()
            .any(|p| p.nik == nik && Some(&p.id) != except)
    }
}

fn directed(ord: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

fn matches(haystack: &str, needle: &Option<String>) -> bool {
    needle
        .as_deref()
        .is_none_or(|n| haystack.to_lowercase().contains(n))
}

#[derive(Clone, Default)]
pub struct InMemoryClinicRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryClinicRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an account visible to appointments and medical records.
    pub async fn add_staff(&self, staff: StaffSummary) {
        self.state
            .write()
            .await
            .staff
            .insert(staff.id.clone(), staff);
    }
}

impl PatientRepository for InMemoryClinicRepository {
    async fn next_patient_sequence(&self) -> ClinicResult<i64> {
        Ok(bump(&mut self.state.write().await.sequences.patient))
    }

    async fn create_patient(&self, patient: &Patient) -> ClinicResult<()> {
        let mut state = self.state.write().await;
        if state.nik_in_use(&patient.nik, None) {
            return Err(ClinicError::NikTaken("NIK already registered"));
        }
        state
            .patients
            .live
            .insert(patient.id.clone(), patient.clone());
        Ok(())
    }

    async fn find_patient(&self, id: &PatientId) -> ClinicResult<Option<Patient>> {
        Ok(self.state.read().await.patients.live.get(id).cloned())
    }

    async fn nik_exists(&self, nik: &str, except: Option<&PatientId>) -> ClinicResult<bool> {
        Ok(self.state.read().await.nik_in_use(nik, except))
    }

    async fn list_patients(
        &self,
        filter: &PatientFilter,
        page: &PageRequest<PatientSortField>,
    ) -> ClinicResult<Paginated<Patient>> {
        let state = self.state.read().await;
        let needle = page.search.as_deref().map(str::to_lowercase);

        let mut patients: Vec<Patient> = state
            .patients
            .live
            .values()
            .filter(|p| filter.gender.is_none_or(|g| p.gender == g))
            .filter(|p| matches(&p.full_name, &needle) || matches(&p.nik, &needle))
            .cloned()
            .collect();

        patients.sort_by(|a, b| {
            let ord = match page.sort {
                PatientSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                PatientSortField::FullName => a.full_name.cmp(&b.full_name),
                PatientSortField::Nik => a.nik.cmp(&b.nik),
                PatientSortField::BirthDate => a.birth_date.cmp(&b.birth_date),
            };
            directed(ord, page.order).then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });

        Ok(page.window(patients))
    }

    async fn update_patient(&self, patient: &Patient) -> ClinicResult<()> {
        let mut state = self.state.write().await;
        if state.nik_in_use(&patient.nik, Some(&patient.id)) {
            return Err(ClinicError::NikTaken("NIK already used"));
        }
        if state.patients.replace(&patient.id, patient) {
            Ok(())
        } else {
            Err(ClinicError::NotFound("Patient not found"))
        }
    }

    async fn soft_delete_patient(&self, id: &PatientId) -> ClinicResult<bool> {
        Ok(self.state.write().await.patients.soft_delete(id))
    }
}

impl AppointmentRepository for InMemoryClinicRepository {
    async fn next_appointment_sequence(&self) -> ClinicResult<i64> {
        Ok(bump(&mut self.state.write().await.sequences.appointment))
    }

    async fn create_appointment(&self, appointment: &Appointment) -> ClinicResult<()> {
        self.state
            .write()
            .await
            .appointments
            .live
            .insert(appointment.id.clone(), appointment.clone());
        Ok(())
    }

    async fn find_appointment(&self, id: &AppointmentId) -> ClinicResult<Option<AppointmentView>> {
        let state = self.state.read().await;
        state
            .appointments
            .live
            .get(id)
            .map(|a| state.appointment_view(a))
            .transpose()
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
        page: &PageRequest<AppointmentSortField>,
    ) -> ClinicResult<Paginated<AppointmentView>> {
        let needle = page.search.as_deref().map(str::to_lowercase);

        let mut views: Vec<AppointmentView> = self
            .find_appointments(filter)
            .await?
            .into_iter()
            .filter(|v| matches(&v.patient.full_name, &needle))
            .collect();

        views.sort_by(|a, b| {
            let (a_, b_) = (&a.appointment, &b.appointment);
            let ord = match page.sort {
                AppointmentSortField::ScheduleAt => a_.schedule_at.cmp(&b_.schedule_at),
                AppointmentSortField::CreatedAt => a_.created_at.cmp(&b_.created_at),
                AppointmentSortField::Status => a_.status.code().cmp(b_.status.code()),
            };
            directed(ord, page.order).then_with(|| a_.id.as_str().cmp(b_.id.as_str()))
        });

        Ok(page.window(views))
    }

    async fn find_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> ClinicResult<Vec<AppointmentView>> {
        let state = self.state.read().await;

        let mut views = state
            .appointments
            .live
            .values()
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .filter(|a| filter.patient_id.as_ref().is_none_or(|id| &a.patient_id == id))
            .filter(|a| filter.user_id.as_ref().is_none_or(|id| &a.user_id == id))
            .map(|a| state.appointment_view(a))
            .collect::<ClinicResult<Vec<_>>>()?;

        views.sort_by(|a, b| {
            a.appointment
                .schedule_at
                .cmp(&b.appointment.schedule_at)
                .then_with(|| a.appointment.id.as_str().cmp(b.appointment.id.as_str()))
        });

        Ok(views)
    }

    async fn update_appointment(&self, appointment: &Appointment) -> ClinicResult<()> {
        if self
            .state
            .write()
            .await
            .appointments
            .replace(&appointment.id, appointment)
        {
            Ok(())
        } else {
            Err(ClinicError::NotFound("Appointment not found"))
        }
    }

    async fn soft_delete_appointment(&self, id: &AppointmentId) -> ClinicResult<bool> {
        Ok(self.state.write().await.appointments.soft_delete(id))
    }
}

impl MedicalRecordRepository for InMemoryClinicRepository {
    async fn next_record_sequence(&self) -> ClinicResult<i64> {
        Ok(bump(&mut self.state.write().await.sequences.record))
    }

    async fn create_record(&self, record: &MedicalRecord) -> ClinicResult<()> {
        self.state
            .write()
            .await
            .records
            .live
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn find_record(&self, id: &MedicalRecordId) -> ClinicResult<Option<MedicalRecordView>> {
        let state = self.state.read().await;
        state
            .records
            .live
            .get(id)
            .map(|r| state.record_view(r))
            .transpose()
    }

    async fn list_records(
        &self,
        filter: &MedicalRecordFilter,
        page: &PageRequest<MedicalRecordSortField>,
    ) -> ClinicResult<Paginated<MedicalRecordView>> {
        let state = self.state.read().await;
        let needle = page.search.as_deref().map(str::to_lowercase);

        let mut views = state
            .records
            .live
            .values()
            .filter(|r| filter.patient_id.as_ref().is_none_or(|id| &r.patient_id == id))
            .filter(|r| filter.user_id.as_ref().is_none_or(|id| &r.user_id == id))
            .filter(|r| matches(&r.diagnosis, &needle) || matches(&r.treatment, &needle))
            .map(|r| state.record_view(r))
            .collect::<ClinicResult<Vec<_>>>()?;

        views.sort_by(|a, b| {
            let (a_, b_) = (&a.record, &b.record);
            let ord = match page.sort {
                MedicalRecordSortField::CreatedAt => a_.created_at.cmp(&b_.created_at),
                MedicalRecordSortField::UpdatedAt => a_.updated_at.cmp(&b_.updated_at),
            };
            directed(ord, page.order).then_with(|| a_.id.as_str().cmp(b_.id.as_str()))
        });

        Ok(page.window(views))
    }

    async fn update_record(&self, record: &MedicalRecord) -> ClinicResult<()> {
        if self.state.write().await.records.replace(&record.id, record) {
            Ok(())
        } else {
            Err(ClinicError::NotFound("Medical record not found"))
        }
    }

    async fn soft_delete_record(&self, id: &MedicalRecordId) -> ClinicResult<bool> {
        Ok(self.state.write().await.records.soft_delete(id))
    }
}

impl AssessmentRepository for InMemoryClinicRepository {
    async fn next_assessment_sequence(&self) -> ClinicResult<i64> {
        Ok(bump(&mut self.state.write().await.sequences.assessment))
    }

    async fn create_assessment(&self, assessment: &Assessment) -> ClinicResult<()> {
        self.state
            .write()
            .await
            .assessments
            .live
            .insert(assessment.id.clone(), assessment.clone());
        Ok(())
    }

    async fn find_assessment(&self, id: &AssessmentId) -> ClinicResult<Option<AssessmentView>> {
        let state = self.state.read().await;
        state
            .assessments
            .live
            .get(id)
            .map(|s| state.assessment_view(s))
            .transpose()
    }

    async fn list_assessments(
        &self,
        filter: &AssessmentFilter,
        page: &PageRequest<AssessmentSortField>,
    ) -> ClinicResult<Paginated<AssessmentView>> {
        let state = self.state.read().await;

        let mut views = state
            .assessments
            .live
            .values()
            .filter(|s| filter.patient_id.as_ref().is_none_or(|id| &s.patient_id == id))
            .map(|s| state.assessment_view(s))
            .collect::<ClinicResult<Vec<_>>>()?;

        views.sort_by(|a, b| {
            let (a_, b_) = (&a.assessment, &b.assessment);
            let ord = match page.sort {
                AssessmentSortField::CreatedAt => a_.created_at.cmp(&b_.created_at),
                AssessmentSortField::Date => a_.date.cmp(&b_.date),
            };
            directed(ord, page.order).then_with(|| a_.id.as_str().cmp(b_.id.as_str()))
        });

        Ok(page.window(views))
    }

    async fn find_assessments_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> ClinicResult<Vec<AssessmentView>> {
        let state = self.state.read().await;

        let mut views = state
            .assessments
            .live
            .values()
            .filter(|s| &s.patient_id == patient_id)
            .map(|s| state.assessment_view(s))
            .collect::<ClinicResult<Vec<_>>>()?;

        views.sort_by(|a, b| {
            b.assessment
                .created_at
                .cmp(&a.assessment.created_at)
                .then_with(|| a.assessment.id.as_str().cmp(b.assessment.id.as_str()))
        });

        Ok(views)
    }

    async fn update_assessment(&self, assessment: &Assessment) -> ClinicResult<()> {
        if self
            .state
            .write()
            .await
            .assessments
            .replace(&assessment.id, assessment)
        {
            Ok(())
        } else {
            Err(ClinicError::NotFound("Assessment not found"))
        }
    }

    async fn soft_delete_assessment(&self, id: &AssessmentId) -> ClinicResult<bool> {
        Ok(self.state.write().await.assessments.soft_delete(id))
    }
}

impl PredictionRepository for InMemoryClinicRepository {
    async fn create_prediction(&self, prediction: &Prediction) -> ClinicResult<()> {
        self.state
            .write()
            .await
            .predictions
            .live
            .insert(prediction.id, prediction.clone());
        Ok(())
    }

    async fn find_prediction(&self, id: &PredictionId) -> ClinicResult<Option<Prediction>> {
        Ok(self.state.read().await.predictions.live.get(id).cloned())
    }

    async fn find_prediction_by_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> ClinicResult<Option<Prediction>> {
        Ok(self.state.read().await.latest_prediction(assessment_id))
    }

    async fn list_predictions(
        &self,
        filter: &PredictionFilter,
        page: &PageRequest<PredictionSortField>,
    ) -> ClinicResult<Paginated<Prediction>> {
        let state = self.state.read().await;

        let mut predictions: Vec<Prediction> = state
            .predictions
            .live
            .values()
            .filter(|p| {
                filter
                    .result_label
                    .as_ref()
                    .is_none_or(|label| &p.result_label == label)
            })
            .cloned()
            .collect();

        predictions.sort_by(|a, b| {
            let ord = match page.sort {
                PredictionSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                PredictionSortField::ProbabilityScore => {
                    a.probability_score.total_cmp(&b.probability_score)
                }
                PredictionSortField::ResultLabel => a.result_label.cmp(&b.result_label),
            };
            directed(ord, page.order).then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });

        Ok(page.window(predictions))
    }

    async fn update_prediction(&self, prediction: &Prediction) -> ClinicResult<()> {
        if self
            .state
            .write()
            .await
            .predictions
            .replace(&prediction.id, prediction)
        {
            Ok(())
        } else {
            Err(ClinicError::NotFound("Prediction not found"))
        }
    }

    async fn soft_delete_prediction(&self, id: &PredictionId) -> ClinicResult<bool> {
        Ok(self.state.write().await.predictions.soft_delete(id))
    }
}

impl StaffDirectory for InMemoryClinicRepository {
    async fn find_staff(&self, id: &UserId) -> ClinicResult<Option<StaffSummary>> {
        Ok(self.state.read().await.staff.get(id).cloned())
    }
}
