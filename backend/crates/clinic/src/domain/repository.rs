//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Soft-deleted rows are invisible to every read, but views still show the
//! summary of a patient or user deleted after the fact.

use auth::models::UserId;
use kernel::id::PredictionId;
use kernel::pagination::{PageRequest, Paginated, SortField, SortOrder};

use crate::domain::entity::{
    Appointment, AppointmentView, Assessment, AssessmentView, MedicalRecord, MedicalRecordView,
    Patient, Prediction, StaffSummary,
};
use crate::domain::value_object::{
    AppointmentId, AppointmentStatus, AssessmentId, Gender, MedicalRecordId, PatientId,
};
use crate::error::ClinicResult;

// ============================================================================
// Sort allow-lists
// ============================================================================

macro_rules! sort_field {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, order = $order:ident,
        { $($variant:ident => $public:literal : $column:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl SortField for $name {
            const DEFAULT: Self = $name::$default;
            const DEFAULT_ORDER: SortOrder = SortOrder::$order;

            fn parse(raw: &str) -> Option<Self> {
                match raw {
                    $($public => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn column(&self) -> &'static str {
                match self {
                    $($name::$variant => $column,)+
                }
            }
        }
    };
}

sort_field!(
    /// Sortable columns of the patient list
    PatientSortField, default = CreatedAt, order = Desc, {
        CreatedAt => "created_at": "p.created_at",
        FullName => "full_name": "p.full_name",
        Nik => "nik": "p.nik",
        BirthDate => "birth_date": "p.birth_date",
    }
);

sort_field!(
    /// Sortable columns of the appointment list. Upcoming first by default.
    AppointmentSortField, default = ScheduleAt, order = Asc, {
        ScheduleAt => "schedule_at": "a.schedule_at",
        CreatedAt => "created_at": "a.created_at",
        Status => "status": "a.status",
    }
);

sort_field!(
    MedicalRecordSortField, default = CreatedAt, order = Desc, {
        CreatedAt => "created_at": "r.created_at",
        UpdatedAt => "updated_at": "r.updated_at",
    }
);

sort_field!(
    AssessmentSortField, default = CreatedAt, order = Desc, {
        CreatedAt => "created_at": "s.created_at",
        Date => "date": "s.date",
    }
);

sort_field!(
    PredictionSortField, default = CreatedAt, order = Desc, {
        CreatedAt => "created_at": "created_at",
        ProbabilityScore => "probability_score": "probability_score",
        ResultLabel => "result_label": "result_label",
    }
);

// ============================================================================
// Filters
// ============================================================================

/// Patient list filters. Search matches full name or NIK.
#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    pub gender: Option<Gender>,
}

/// Appointment list filters. Search matches the patient's name.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub patient_id: Option<PatientId>,
    pub user_id: Option<UserId>,
}

/// Medical record list filters. Search matches diagnosis or treatment.
#[derive(Debug, Clone, Default)]
pub struct MedicalRecordFilter {
    pub patient_id: Option<PatientId>,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default)]
pub struct AssessmentFilter {
    pub patient_id: Option<PatientId>,
}

#[derive(Debug, Clone, Default)]
pub struct PredictionFilter {
    pub result_label: Option<String>,
}

// ============================================================================
// Repositories
// ============================================================================

/// Patient repository trait
#[trait_variant::make(PatientRepository: Send)]
pub trait LocalPatientRepository {
    /// Next value of the patient id counter. Never reused.
    async fn next_patient_sequence(&self) -> ClinicResult<i64>;

    /// Fails with a NIK conflict if a live patient already has the NIK.
    async fn create_patient(&self, patient: &Patient) -> ClinicResult<()>;

    async fn find_patient(&self, id: &PatientId) -> ClinicResult<Option<Patient>>;

    /// Whether a live patient other than `except` holds `nik`.
    async fn nik_exists(&self, nik: &str, except: Option<&PatientId>) -> ClinicResult<bool>;

    async fn list_patients(
        &self,
        filter: &PatientFilter,
        page: &PageRequest<PatientSortField>,
    ) -> ClinicResult<Paginated<Patient>>;

    async fn update_patient(&self, patient: &Patient) -> ClinicResult<()>;

    /// Returns `false` if no live patient had this id.
    async fn soft_delete_patient(&self, id: &PatientId) -> ClinicResult<bool>;
}

/// Appointment repository trait
#[trait_variant::make(AppointmentRepository: Send)]
pub trait LocalAppointmentRepository {
    async fn next_appointment_sequence(&self) -> ClinicResult<i64>;

    async fn create_appointment(&self, appointment: &Appointment) -> ClinicResult<()>;

    async fn find_appointment(&self, id: &AppointmentId) -> ClinicResult<Option<AppointmentView>>;

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
        page: &PageRequest<AppointmentSortField>,
    ) -> ClinicResult<Paginated<AppointmentView>>;

    /// Every matching appointment, earliest schedule first.
    async fn find_appointments(&self, filter: &AppointmentFilter)
    -> ClinicResult<Vec<AppointmentView>>;

    async fn update_appointment(&self, appointment: &Appointment) -> ClinicResult<()>;

    async fn soft_delete_appointment(&self, id: &AppointmentId) -> ClinicResult<bool>;
}

/// Medical record repository trait
#[trait_variant::make(MedicalRecordRepository: Send)]
pub trait LocalMedicalRecordRepository {
    async fn next_record_sequence(&self) -> ClinicResult<i64>;

    async fn create_record(&self, record: &MedicalRecord) -> ClinicResult<()>;

    async fn find_record(&self, id: &MedicalRecordId) -> ClinicResult<Option<MedicalRecordView>>;

    async fn list_records(
        &self,
        filter: &MedicalRecordFilter,
        page: &PageRequest<MedicalRecordSortField>,
    ) -> ClinicResult<Paginated<MedicalRecordView>>;

    async fn update_record(&self, record: &MedicalRecord) -> ClinicResult<()>;

    async fn soft_delete_record(&self, id: &MedicalRecordId) -> ClinicResult<bool>;
}

/// Assessment repository trait
#[trait_variant::make(AssessmentRepository: Send)]
pub trait LocalAssessmentRepository {
    async fn next_assessment_sequence(&self) -> ClinicResult<i64>;

    async fn create_assessment(&self, assessment: &Assessment) -> ClinicResult<()>;

    async fn find_assessment(&self, id: &AssessmentId) -> ClinicResult<Option<AssessmentView>>;

    async fn list_assessments(
        &self,
        filter: &AssessmentFilter,
        page: &PageRequest<AssessmentSortField>,
    ) -> ClinicResult<Paginated<AssessmentView>>;

    /// Every assessment of one patient, newest first.
    async fn find_assessments_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> ClinicResult<Vec<AssessmentView>>;

    async fn update_assessment(&self, assessment: &Assessment) -> ClinicResult<()>;

    async fn soft_delete_assessment(&self, id: &AssessmentId) -> ClinicResult<bool>;
}

/// Prediction repository trait
#[trait_variant::make(PredictionRepository: Send)]
pub trait LocalPredictionRepository {
    async fn create_prediction(&self, prediction: &Prediction) -> ClinicResult<()>;

    async fn find_prediction(&self, id: &PredictionId) -> ClinicResult<Option<Prediction>>;

    /// Newest live prediction of the assessment.
    async fn find_prediction_by_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> ClinicResult<Option<Prediction>>;

    async fn list_predictions(
        &self,
        filter: &PredictionFilter,
        page: &PageRequest<PredictionSortField>,
    ) -> ClinicResult<Paginated<Prediction>>;

    async fn update_prediction(&self, prediction: &Prediction) -> ClinicResult<()>;

    async fn soft_delete_prediction(&self, id: &PredictionId) -> ClinicResult<bool>;
}

/// Read access to the accounts clinic records point at
#[trait_variant::make(StaffDirectory: Send)]
pub trait LocalStaffDirectory {
    /// Live account with this id, if any.
    async fn find_staff(&self, id: &UserId) -> ClinicResult<Option<StaffSummary>>;
}

/// Everything the clinic router needs from one store
pub trait ClinicStore:
    PatientRepository
    + AppointmentRepository
    + MedicalRecordRepository
    + AssessmentRepository
    + PredictionRepository
    + StaffDirectory
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> ClinicStore for T where
    T: PatientRepository
        + AppointmentRepository
        + MedicalRecordRepository
        + AssessmentRepository
        + PredictionRepository
        + StaffDirectory
        + Clone
        + Send
        + Sync
        + 'static
{
}
