//! PostgreSQL Repository Implementations

use auth::models::{UserId, UserRole};
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::PredictionId;
use kernel::pagination::{PageRequest, Paginated, SortField};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

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
use crate::domain::value_object::{
    AppointmentId, AppointmentStatus, AssessmentId, Gender, MedicalRecordId, PatientId,
};
use crate::error::{ClinicError, ClinicResult};

/// PostgreSQL-backed clinic repository
#[derive(Clone)]
pub struct PgClinicRepository {
    pool: PgPool,
}

impl PgClinicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn nextval(&self, sql: &'static str) -> ClinicResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?)
    }
}

// ============================================================================
// Shared query fragments
// ============================================================================

const PATIENT_SELECT: &str = "SELECT p.id, p.full_name, p.nik, p.birth_date, p.gender, p.phone, \
     p.address, p.emergency_contact, p.created_at, p.updated_at FROM patients p \
     WHERE p.deleted_at IS NULL";

const APPOINTMENT_SELECT: &str = "SELECT a.id, a.patient_id, a.user_id, a.schedule_at, a.status, \
     a.notes, a.created_at, a.updated_at, p.full_name AS patient_full_name, \
     p.gender AS patient_gender, p.birth_date AS patient_birth_date, \
     u.full_name AS user_full_name, u.role AS user_role, u.email AS user_email";

const APPOINTMENT_FROM: &str = " FROM appointments a \
     JOIN patients p ON p.id = a.patient_id \
     JOIN users u ON u.id = a.user_id \
     WHERE a.deleted_at IS NULL";

const RECORD_SELECT: &str = "SELECT r.id, r.patient_id, r.user_id, r.diagnosis, r.treatment, \
     r.created_at, r.updated_at, p.full_name AS patient_full_name, \
     p.gender AS patient_gender, p.birth_date AS patient_birth_date, \
     u.full_name AS user_full_name, u.role AS user_role, u.email AS user_email";

const RECORD_FROM: &str = " FROM medical_records r \
     JOIN patients p ON p.id = r.patient_id \
     JOIN users u ON u.id = r.user_id \
     WHERE r.deleted_at IS NULL";

const ASSESSMENT_SELECT: &str = "SELECT s.id, s.patient_id, s.date, s.answers, s.created_at, \
     s.updated_at, p.full_name AS patient_full_name, p.gender AS patient_gender, \
     p.birth_date AS patient_birth_date, pr.id AS prediction_id, \
     pr.result_label AS prediction_label, pr.probability_score AS prediction_score, \
     pr.created_at AS prediction_created_at, pr.updated_at AS prediction_updated_at";

/// Latest live prediction per assessment
const ASSESSMENT_FROM: &str = " FROM assessments s \
     JOIN patients p ON p.id = s.patient_id \
     LEFT JOIN LATERAL ( \
         SELECT id, result_label, probability_score, created_at, updated_at \
         FROM predictions \
         WHERE assessment_id = s.id AND deleted_at IS NULL \
         ORDER BY created_at DESC \
         LIMIT 1 \
     ) pr ON TRUE \
     WHERE s.deleted_at IS NULL";

const PREDICTION_SELECT: &str = "SELECT id, assessment_id, result_label, probability_score, \
     created_at, updated_at FROM predictions WHERE deleted_at IS NULL";

/// `ORDER BY <allow-listed column> <dir>, <tiebreak> LIMIT .. OFFSET ..`
fn push_window<S: SortField>(
    qb: &mut QueryBuilder<'_, Postgres>,
    page: &PageRequest<S>,
    tiebreak: &str,
) {
    qb.push(format!(
        " ORDER BY {} {}, {tiebreak} ASC LIMIT ",
        page.sort.column(),
        page.order.as_sql()
    ))
    .push_bind(i64::from(page.limit))
    .push(" OFFSET ")
    .push_bind(page.offset());
}

fn unique_nik(err: sqlx::Error, message: &'static str) -> ClinicError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ClinicError::NikTaken(message)
        }
        _ => ClinicError::Database(err),
    }
}

// ============================================================================
// Patients
// ============================================================================

fn push_patient_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &PatientFilter,
    page: &PageRequest<PatientSortField>,
) {
    if let Some(pattern) = page.search_pattern() {
        qb.push(" AND (p.full_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.nik ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(gender) = filter.gender {
        qb.push(" AND p.gender = ").push_bind(gender.code());
    }
}

impl PatientRepository for PgClinicRepository {
    async fn next_patient_sequence(&self) -> ClinicResult<i64> {
        self.nextval("SELECT nextval('patient_seq')").await
    }

    async fn create_patient(&self, patient: &Patient) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO patients (
                id, full_name, nik, birth_date, gender, phone, address,
                emergency_contact, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(patient.id.as_str())
        .bind(&patient.full_name)
        .bind(&patient.nik)
        .bind(patient.birth_date)
        .bind(patient.gender.code())
        .bind(&patient.phone)
        .bind(&patient.address)
        .bind(&patient.emergency_contact)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_nik(e, "NIK already registered"))?;

        Ok(())
    }

    async fn find_patient(&self, id: &PatientId) -> ClinicResult<Option<Patient>> {
        let row = sqlx::query_as::<_, PatientRow>(&format!("{PATIENT_SELECT} AND p.id = $1"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PatientRow::into_patient).transpose()
    }

    async fn nik_exists(&self, nik: &str, except: Option<&PatientId>) -> ClinicResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM patients
                WHERE nik = $1
                  AND deleted_at IS NULL
                  AND ($2::text IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(nik)
        .bind(except.map(|id| id.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_patients(
        &self,
        filter: &PatientFilter,
        page: &PageRequest<PatientSortField>,
    ) -> ClinicResult<Paginated<Patient>> {
        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM patients p WHERE p.deleted_at IS NULL",
        );
        push_patient_filters(&mut count, filter, page);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(PATIENT_SELECT);
        push_patient_filters(&mut select, filter, page);
        push_window(&mut select, page, "p.id");

        let patients = select
            .build_query_as::<PatientRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(PatientRow::into_patient)
            .collect::<ClinicResult<Vec<_>>>()?;

        Ok(Paginated::new(patients, total, page))
    }

    async fn update_patient(&self, patient: &Patient) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE patients SET
                full_name = $2,
                nik = $3,
                birth_date = $4,
                gender = $5,
                phone = $6,
                address = $7,
                emergency_contact = $8,
                updated_at = $9
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(patient.id.as_str())
        .bind(&patient.full_name)
        .bind(&patient.nik)
        .bind(patient.birth_date)
        .bind(patient.gender.code())
        .bind(&patient.phone)
        .bind(&patient.address)
        .bind(&patient.emergency_contact)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_nik(e, "NIK already used"))?;

        Ok(())
    }

    async fn soft_delete_patient(&self, id: &PatientId) -> ClinicResult<bool> {
        soft_delete(&self.pool, "patients", id.as_str()).await
    }
}

// ============================================================================
// Appointments
// ============================================================================

fn push_appointment_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &AppointmentFilter,
    search: Option<String>,
) {
    if let Some(pattern) = search {
        qb.push(" AND p.full_name ILIKE ").push_bind(pattern);
    }
    if let Some(status) = filter.status {
        qb.push(" AND a.status = ").push_bind(status.code());
    }
    if let Some(patient_id) = &filter.patient_id {
        qb.push(" AND a.patient_id = ")
            .push_bind(patient_id.as_str().to_owned());
    }
    if let Some(user_id) = &filter.user_id {
        qb.push(" AND a.user_id = ").push_bind(user_id.as_str().to_owned());
    }
}

impl AppointmentRepository for PgClinicRepository {
    async fn next_appointment_sequence(&self) -> ClinicResult<i64> {
        self.nextval("SELECT nextval('appointment_seq')").await
    }

    async fn create_appointment(&self, appointment: &Appointment) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, patient_id, user_id, schedule_at, status, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(appointment.id.as_str())
        .bind(appointment.patient_id.as_str())
        .bind(appointment.user_id.as_str())
        .bind(appointment.schedule_at)
        .bind(appointment.status.code())
        .bind(&appointment.notes)
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_appointment(&self, id: &AppointmentId) -> ClinicResult<Option<AppointmentView>> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{APPOINTMENT_SELECT}{APPOINTMENT_FROM} AND a.id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AppointmentRow::into_view).transpose()
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
        page: &PageRequest<AppointmentSortField>,
    ) -> ClinicResult<Paginated<AppointmentView>> {
        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*){APPOINTMENT_FROM}"));
        push_appointment_filters(&mut count, filter, page.search_pattern());
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("{APPOINTMENT_SELECT}{APPOINTMENT_FROM}"));
        push_appointment_filters(&mut select, filter, page.search_pattern());
        push_window(&mut select, page, "a.id");

        let views = select
            .build_query_as::<AppointmentRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(AppointmentRow::into_view)
            .collect::<ClinicResult<Vec<_>>>()?;

        Ok(Paginated::new(views, total, page))
    }

    async fn find_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> ClinicResult<Vec<AppointmentView>> {
        let mut select =
            QueryBuilder::<Postgres>::new(format!("{APPOINTMENT_SELECT}{APPOINTMENT_FROM}"));
        push_appointment_filters(&mut select, filter, None);
        select.push(" ORDER BY a.schedule_at ASC, a.id ASC");

        select
            .build_query_as::<AppointmentRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(AppointmentRow::into_view)
            .collect()
    }

    async fn update_appointment(&self, appointment: &Appointment) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE appointments SET
                schedule_at = $2,
                status = $3,
                notes = $4,
                updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(appointment.id.as_str())
        .bind(appointment.schedule_at)
        .bind(appointment.status.code())
        .bind(&appointment.notes)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete_appointment(&self, id: &AppointmentId) -> ClinicResult<bool> {
        soft_delete(&self.pool, "appointments", id.as_str()).await
    }
}

// ============================================================================
// Medical Records
// ============================================================================

fn push_record_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &MedicalRecordFilter,
    page: &PageRequest<MedicalRecordSortField>,
) {
    if let Some(pattern) = page.search_pattern() {
        qb.push(" AND (r.diagnosis ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR r.treatment ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(patient_id) = &filter.patient_id {
        qb.push(" AND r.patient_id = ")
            .push_bind(patient_id.as_str().to_owned());
    }
    if let Some(user_id) = &filter.user_id {
        qb.push(" AND r.user_id = ").push_bind(user_id.as_str().to_owned());
    }
}

impl MedicalRecordRepository for PgClinicRepository {
    async fn next_record_sequence(&self) -> ClinicResult<i64> {
        self.nextval("SELECT nextval('record_seq')").await
    }

    async fn create_record(&self, record: &MedicalRecord) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO medical_records (
                id, patient_id, user_id, diagnosis, treatment, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.patient_id.as_str())
        .bind(record.user_id.as_str())
        .bind(&record.diagnosis)
        .bind(&record.treatment)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_record(&self, id: &MedicalRecordId) -> ClinicResult<Option<MedicalRecordView>> {
        let row =
            sqlx::query_as::<_, RecordRow>(&format!("{RECORD_SELECT}{RECORD_FROM} AND r.id = $1"))
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(RecordRow::into_view).transpose()
    }

    async fn list_records(
        &self,
        filter: &MedicalRecordFilter,
        page: &PageRequest<MedicalRecordSortField>,
    ) -> ClinicResult<Paginated<MedicalRecordView>> {
        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*){RECORD_FROM}"));
        push_record_filters(&mut count, filter, page);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("{RECORD_SELECT}{RECORD_FROM}"));
        push_record_filters(&mut select, filter, page);
        push_window(&mut select, page, "r.id");

        let views = select
            .build_query_as::<RecordRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(RecordRow::into_view)
            .collect::<ClinicResult<Vec<_>>>()?;

        Ok(Paginated::new(views, total, page))
    }

    async fn update_record(&self, record: &MedicalRecord) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE medical_records SET
                patient_id = $2,
                user_id = $3,
                diagnosis = $4,
                treatment = $5,
                updated_at = $6
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.patient_id.as_str())
        .bind(record.user_id.as_str())
        .bind(&record.diagnosis)
        .bind(&record.treatment)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete_record(&self, id: &MedicalRecordId) -> ClinicResult<bool> {
        soft_delete(&self.pool, "medical_records", id.as_str()).await
    }
}

// ============================================================================
// Assessments
// ============================================================================

impl AssessmentRepository for PgClinicRepository {
    async fn next_assessment_sequence(&self) -> ClinicResult<i64> {
        self.nextval("SELECT nextval('assessment_seq')").await
    }

    async fn create_assessment(&self, assessment: &Assessment) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO assessments (id, patient_id, date, answers, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(assessment.id.as_str())
        .bind(assessment.patient_id.as_str())
        .bind(assessment.date)
        .bind(Json(&assessment.answers))
        .bind(assessment.created_at)
        .bind(assessment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_assessment(&self, id: &AssessmentId) -> ClinicResult<Option<AssessmentView>> {
        let row = sqlx::query_as::<_, AssessmentRow>(&format!(
            "{ASSESSMENT_SELECT}{ASSESSMENT_FROM} AND s.id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AssessmentRow::into_view).transpose()
    }

    async fn list_assessments(
        &self,
        filter: &AssessmentFilter,
        page: &PageRequest<AssessmentSortField>,
    ) -> ClinicResult<Paginated<AssessmentView>> {
        let patient_id = filter.patient_id.as_ref().map(|id| id.as_str().to_owned());

        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM assessments s WHERE s.deleted_at IS NULL");
        if let Some(patient_id) = &patient_id {
            count.push(" AND s.patient_id = ").push_bind(patient_id.clone());
        }
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("{ASSESSMENT_SELECT}{ASSESSMENT_FROM}"));
        if let Some(patient_id) = patient_id {
            select.push(" AND s.patient_id = ").push_bind(patient_id);
        }
        push_window(&mut select, page, "s.id");

        let views = select
            .build_query_as::<AssessmentRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(AssessmentRow::into_view)
            .collect::<ClinicResult<Vec<_>>>()?;

        Ok(Paginated::new(views, total, page))
    }

    async fn find_assessments_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> ClinicResult<Vec<AssessmentView>> {
        sqlx::query_as::<_, AssessmentRow>(&format!(
            "{ASSESSMENT_SELECT}{ASSESSMENT_FROM} AND s.patient_id = $1 \
             ORDER BY s.created_at DESC, s.id ASC"
        ))
        .bind(patient_id.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(AssessmentRow::into_view)
        .collect()
    }

    async fn update_assessment(&self, assessment: &Assessment) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE assessments SET
                date = $2,
                answers = $3,
                updated_at = $4
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(assessment.id.as_str())
        .bind(assessment.date)
        .bind(Json(&assessment.answers))
        .bind(assessment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete_assessment(&self, id: &AssessmentId) -> ClinicResult<bool> {
        soft_delete(&self.pool, "assessments", id.as_str()).await
    }
}

// ============================================================================
// Predictions
// ============================================================================

impl PredictionRepository for PgClinicRepository {
    async fn create_prediction(&self, prediction: &Prediction) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO predictions (
                id, assessment_id, result_label, probability_score, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(prediction.id.as_uuid())
        .bind(prediction.assessment_id.as_str())
        .bind(&prediction.result_label)
        .bind(prediction.probability_score)
        .bind(prediction.created_at)
        .bind(prediction.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_prediction(&self, id: &PredictionId) -> ClinicResult<Option<Prediction>> {
        let row = sqlx::query_as::<_, PredictionRow>(&format!("{PREDICTION_SELECT} AND id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PredictionRow::into_prediction))
    }

    async fn find_prediction_by_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> ClinicResult<Option<Prediction>> {
        let row = sqlx::query_as::<_, PredictionRow>(&format!(
            "{PREDICTION_SELECT} AND assessment_id = $1 ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(assessment_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PredictionRow::into_prediction))
    }

    async fn list_predictions(
        &self,
        filter: &PredictionFilter,
        page: &PageRequest<PredictionSortField>,
    ) -> ClinicResult<Paginated<Prediction>> {
        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM predictions WHERE deleted_at IS NULL",
        );
        if let Some(label) = &filter.result_label {
            count.push(" AND result_label = ").push_bind(label.clone());
        }
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(PREDICTION_SELECT);
        if let Some(label) = &filter.result_label {
            select.push(" AND result_label = ").push_bind(label.clone());
        }
        push_window(&mut select, page, "id");

        let predictions = select
            .build_query_as::<PredictionRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(PredictionRow::into_prediction)
            .collect();

        Ok(Paginated::new(predictions, total, page))
    }

    async fn update_prediction(&self, prediction: &Prediction) -> ClinicResult<()> {
        sqlx::query(
            r#"
            UPDATE predictions SET
                result_label = $2,
                probability_score = $3,
                updated_at = $4
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(prediction.id.as_uuid())
        .bind(&prediction.result_label)
        .bind(prediction.probability_score)
        .bind(prediction.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete_prediction(&self, id: &PredictionId) -> ClinicResult<bool> {
        let affected = sqlx::query(
            "UPDATE predictions SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Staff
// ============================================================================

impl StaffDirectory for PgClinicRepository {
    async fn find_staff(&self, id: &UserId) -> ClinicResult<Option<StaffSummary>> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, full_name, role, email FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| staff_summary(r.id, r.full_name, &r.role, r.email))
            .transpose()
    }
}

/// Soft delete by text id. `table` is always a literal from this module.
async fn soft_delete(pool: &PgPool, table: &'static str, id: &str) -> ClinicResult<bool> {
    let affected = sqlx::query(&format!(
        "UPDATE {table} SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

// ============================================================================
// Row Types
// ============================================================================

fn gender(code: &str) -> ClinicResult<Gender> {
    Gender::from_code(code)
        .ok_or_else(|| ClinicError::Internal(format!("Invalid gender in patients table: {code}")))
}

fn patient_summary(
    id: String,
    full_name: String,
    gender_code: &str,
    birth_date: NaiveDate,
) -> ClinicResult<PatientSummary> {
    Ok(PatientSummary {
        id: PatientId::from_db(id),
        full_name,
        gender: gender(gender_code)?,
        birth_date,
    })
}

fn staff_summary(
    id: String,
    full_name: String,
    role_code: &str,
    email: String,
) -> ClinicResult<StaffSummary> {
    let role = UserRole::from_code(role_code).ok_or_else(|| {
        ClinicError::Internal(format!("Invalid role in users table: {role_code}"))
    })?;

    Ok(StaffSummary {
        id: UserId::from_db(id),
        full_name,
        role,
        email,
    })
}

#[derive(sqlx::FromRow)]
struct PatientRow {
    id: String,
    full_name: String,
    nik: String,
    birth_date: NaiveDate,
    gender: String,
    phone: String,
    address: String,
    emergency_contact: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PatientRow {
    fn into_patient(self) -> ClinicResult<Patient> {
        Ok(Patient {
            id: PatientId::from_db(self.id),
            full_name: self.full_name,
            nik: self.nik,
            birth_date: self.birth_date,
            gender: gender(&self.gender)?,
            phone: self.phone,
            address: self.address,
            emergency_contact: self.emergency_contact,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StaffRow {
    id: String,
    full_name: String,
    role: String,
    email: String,
}

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: String,
    patient_id: String,
    user_id: String,
    schedule_at: DateTime<Utc>,
    status: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    patient_full_name: String,
    patient_gender: String,
    patient_birth_date: NaiveDate,
    user_full_name: String,
    user_role: String,
    user_email: String,
}

impl AppointmentRow {
    fn into_view(self) -> ClinicResult<AppointmentView> {
        let status = AppointmentStatus::from_code(&self.status).ok_or_else(|| {
            ClinicError::Internal(format!("Invalid status in appointments table: {}", self.status))
        })?;

        Ok(AppointmentView {
            patient: patient_summary(
                self.patient_id.clone(),
                self.patient_full_name,
                &self.patient_gender,
                self.patient_birth_date,
            )?,
            user: staff_summary(
                self.user_id.clone(),
                self.user_full_name,
                &self.user_role,
                self.user_email,
            )?,
            appointment: Appointment {
                id: AppointmentId::from_db(self.id),
                patient_id: PatientId::from_db(self.patient_id),
                user_id: UserId::from_db(self.user_id),
                schedule_at: self.schedule_at,
                status,
                notes: self.notes,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        })
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: String,
    patient_id: String,
    user_id: String,
    diagnosis: String,
    treatment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    patient_full_name: String,
    patient_gender: String,
    patient_birth_date: NaiveDate,
    user_full_name: String,
    user_role: String,
    user_email: String,
}

impl RecordRow {
    fn into_view(self) -> ClinicResult<MedicalRecordView> {
        Ok(MedicalRecordView {
            patient: patient_summary(
                self.patient_id.clone(),
                self.patient_full_name,
                &self.patient_gender,
                self.patient_birth_date,
            )?,
            user: staff_summary(
                self.user_id.clone(),
                self.user_full_name,
                &self.user_role,
                self.user_email,
            )?,
            record: MedicalRecord {
                id: MedicalRecordId::from_db(self.id),
                patient_id: PatientId::from_db(self.patient_id),
                user_id: UserId::from_db(self.user_id),
                diagnosis: self.diagnosis,
                treatment: self.treatment,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        })
    }
}

#[derive(sqlx::FromRow)]
struct AssessmentRow {
    id: String,
    patient_id: String,
    date: DateTime<Utc>,
    answers: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    patient_full_name: String,
    patient_gender: String,
    patient_birth_date: NaiveDate,
    prediction_id: Option<Uuid>,
    prediction_label: Option<String>,
    prediction_score: Option<f64>,
    prediction_created_at: Option<DateTime<Utc>>,
    prediction_updated_at: Option<DateTime<Utc>>,
}

impl AssessmentRow {
    fn into_view(self) -> ClinicResult<AssessmentView> {
        let assessment_id = AssessmentId::from_db(self.id);

        let prediction = match (
            self.prediction_id,
            self.prediction_label,
            self.prediction_score,
            self.prediction_created_at,
            self.prediction_updated_at,
        ) {
            (Some(id), Some(label), Some(score), Some(created_at), Some(updated_at)) => {
                Some(Prediction {
                    id: PredictionId::from_uuid(id),
                    assessment_id: assessment_id.clone(),
                    result_label: label,
                    probability_score: score,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        Ok(AssessmentView {
            patient: patient_summary(
                self.patient_id.clone(),
                self.patient_full_name,
                &self.patient_gender,
                self.patient_birth_date,
            )?,
            assessment: Assessment {
                id: assessment_id,
                patient_id: PatientId::from_db(self.patient_id),
                date: self.date,
                answers: self.answers.0,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            prediction,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PredictionRow {
    id: Uuid,
    assessment_id: String,
    result_label: String,
    probability_score: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PredictionRow {
    fn into_prediction(self) -> Prediction {
        Prediction {
            id: PredictionId::from_uuid(self.id),
            assessment_id: AssessmentId::from_db(self.assessment_id),
            result_label: self.result_label,
            probability_score: self.probability_score,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
