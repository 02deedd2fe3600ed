//! HTTP Handlers

use std::sync::Arc;

use auth::models::UserId;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::error::app_error::ErrorBody;
use kernel::extract::{ValidJson, ValidQuery};
use kernel::pagination::{PageQuery, Paginated};

use crate::application::{
    AppointmentUseCase, AssessmentInput, AssessmentUseCase, CreateAppointmentInput,
    CreatePatientInput, MedicalRecordInput, MedicalRecordUseCase, PatientUseCase,
    PredictionUseCase, UpdateAppointmentInput, UpdatePatientInput, UpdatePredictionInput, present,
};
use crate::application::patients::parse_gender;
use crate::domain::repository::{
    AppointmentFilter, AppointmentSortField, AssessmentFilter, AssessmentSortField, ClinicStore,
    MedicalRecordFilter, MedicalRecordSortField, PatientFilter, PatientSortField,
    PredictionFilter, PredictionSortField,
};
use crate::domain::service::PredictionService;
use crate::domain::value_object::{
    AppointmentId, AppointmentStatus, AssessmentId, MedicalRecordId, PatientId,
};
use crate::error::{ClinicError, ClinicResult};
use crate::presentation::dto::{
    AppointmentListQuery, AppointmentResponse, AppointmentStatusRequest, AssessmentListQuery,
    AssessmentResponse, CreateAppointmentRequest, CreateAppointmentResponse,
    CreateAssessmentRequest, CreateAssessmentResponse, CreateMedicalRecordResponse,
    CreatePatientRequest, CreatePatientResponse, AssessmentData, AssessmentListData, MedicalRecordListQuery,
    MedicalRecordRequest, MedicalRecordResponse, MessageResponse, PatientListQuery,
    PatientResponse, PredictionListQuery, PredictionResponse, UpdateAppointmentRequest,
    UpdateAssessmentRequest, UpdateAssessmentResponse, UpdatePatientRequest,
    UpdatePredictionRequest, UpdatedFieldsResponse,
};

/// Shared state for clinic handlers
pub struct ClinicAppState<R, P> {
    pub repo: Arc<R>,
    pub predictor: Arc<P>,
}

impl<R, P> Clone for ClinicAppState<R, P> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            predictor: self.predictor.clone(),
        }
    }
}

// ============================================================================
// Patients
// ============================================================================

/// POST /api/patients
#[utoipa::path(
    post,
    path = "/api/patients",
    tag = "patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient registered", body = CreatePatientResponse),
        (status = 400, description = "Invalid input or NIK already registered", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_patient<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidJson(req): ValidJson<CreatePatientRequest>,
) -> ClinicResult<(StatusCode, Json<CreatePatientResponse>)>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let patient = PatientUseCase::new(state.repo.clone())
        .create(CreatePatientInput {
            full_name: req.full_name,
            nik: req.nik,
            birth_date: req.birth_date,
            gender: req.gender,
            phone: req.phone,
            address: req.address,
            emergency_contact: req.emergency_contact,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePatientResponse {
            message: "Patient created successfully",
            patient: patient.into(),
        }),
    ))
}

/// GET /api/patients
#[utoipa::path(
    get,
    path = "/api/patients",
    tag = "patients",
    params(PageQuery, PatientListQuery),
    responses(
        (status = 200, description = "One page of patients", body = Paginated<PatientResponse>),
        (status = 400, description = "Invalid paging or filter", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_patients<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(query): ValidQuery<PatientListQuery>,
) -> ClinicResult<Json<Paginated<PatientResponse>>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let page = page.resolve::<PatientSortField>()?;
    let gender = present(query.gender)
        .map(|raw| parse_gender(&raw))
        .transpose()?;

    let patients = PatientUseCase::new(state.repo.clone())
        .list(PatientFilter { gender }, page)
        .await?;

    Ok(Json(patients.map(PatientResponse::from)))
}

/// GET /api/patients/{id}
#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient", body = PatientResponse),
        (status = 404, description = "No such patient", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_patient<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<PatientResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let patient = PatientUseCase::new(state.repo.clone())
        .get(&PatientId::from_db(id))
        .await?;

    Ok(Json(patient.into()))
}

/// PUT /api/patients/{id}
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = String, Path, description = "Patient id")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = PatientResponse),
        (status = 400, description = "Invalid input or NIK already used", body = ErrorBody),
        (status = 404, description = "No such patient", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_patient<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdatePatientRequest>,
) -> ClinicResult<Json<PatientResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let patient = PatientUseCase::new(state.repo.clone())
        .update(
            &PatientId::from_db(id),
            UpdatePatientInput {
                full_name: req.full_name,
                nik: req.nik,
                birth_date: req.birth_date,
                gender: req.gender,
                phone: req.phone,
                address: req.address,
                emergency_contact: req.emergency_contact,
            },
        )
        .await?;

    Ok(Json(patient.into()))
}

/// DELETE /api/patients/{id}
#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient soft-deleted", body = MessageResponse),
        (status = 404, description = "No such patient", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_patient<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<MessageResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    PatientUseCase::new(state.repo.clone())
        .delete(&PatientId::from_db(id))
        .await?;

    Ok(Json(MessageResponse {
        message: "Patient deleted successfully",
    }))
}

// ============================================================================
// Appointments
// ============================================================================

/// POST /api/appointments
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked as pending", body = CreateAppointmentResponse),
        (status = 400, description = "Invalid input, unknown patient or user", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_appointment<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidJson(req): ValidJson<CreateAppointmentRequest>,
) -> ClinicResult<(StatusCode, Json<CreateAppointmentResponse>)>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let view = AppointmentUseCase::new(state.repo.clone())
        .create(CreateAppointmentInput {
            patient_id: req.patient_id,
            user_id: req.user_id,
            schedule_at: req.schedule_at,
            notes: req.notes,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAppointmentResponse {
            message: "Appointment created",
            appointment: view.into(),
        }),
    ))
}

/// GET /api/appointments
#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "appointments",
    params(PageQuery, AppointmentListQuery),
    responses(
        (status = 200, description = "One page of appointments", body = Paginated<AppointmentResponse>),
        (status = 400, description = "Invalid paging or filter", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_appointments<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(query): ValidQuery<AppointmentListQuery>,
) -> ClinicResult<Json<Paginated<AppointmentResponse>>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let page = page.resolve::<AppointmentSortField>()?;
    let status = match present(query.status) {
        Some(raw) => Some(
            AppointmentStatus::from_code(&raw)
                .ok_or_else(|| ClinicError::validation("Invalid status filter"))?,
        ),
        None => None,
    };
    let filter = AppointmentFilter {
        status,
        patient_id: present(query.patient_id).map(PatientId::from_db),
        user_id: present(query.user_id).map(UserId::from_db),
    };

    let views = AppointmentUseCase::new(state.repo.clone())
        .list(filter, page)
        .await?;

    Ok(Json(views.map(AppointmentResponse::from)))
}

/// GET /api/appointments/{id}
#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    tag = "appointments",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "The appointment", body = AppointmentResponse),
        (status = 404, description = "No such appointment", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_appointment<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<AppointmentResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let view = AppointmentUseCase::new(state.repo.clone())
        .get(&AppointmentId::from_db(id))
        .await?;

    Ok(Json(view.into()))
}

/// GET /api/appointments/patient/{patient_id}
#[utoipa::path(
    get,
    path = "/api/appointments/patient/{patient_id}",
    tag = "appointments",
    params(("patient_id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient's appointments, earliest first", body = [AppointmentResponse]),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_patient_appointments<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(patient_id): Path<String>,
) -> ClinicResult<Json<Vec<AppointmentResponse>>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let views = AppointmentUseCase::new(state.repo.clone())
        .list_by_patient(PatientId::from_db(patient_id))
        .await?;

    Ok(Json(views.into_iter().map(AppointmentResponse::from).collect()))
}

/// GET /api/appointments/user/{user_id}
#[utoipa::path(
    get,
    path = "/api/appointments/user/{user_id}",
    tag = "appointments",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The staff member's appointments, earliest first", body = [AppointmentResponse]),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_user_appointments<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(user_id): Path<String>,
) -> ClinicResult<Json<Vec<AppointmentResponse>>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let views = AppointmentUseCase::new(state.repo.clone())
        .list_by_user(UserId::from_db(user_id))
        .await?;

    Ok(Json(views.into_iter().map(AppointmentResponse::from).collect()))
}

/// PUT /api/appointments/{id}
#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "appointments",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Changed fields", body = UpdatedFieldsResponse),
        (status = 400, description = "No fields to update", body = ErrorBody),
        (status = 404, description = "No such appointment", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_appointment<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateAppointmentRequest>,
) -> ClinicResult<Json<UpdatedFieldsResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let updated_fields = AppointmentUseCase::new(state.repo.clone())
        .update(
            &AppointmentId::from_db(id),
            UpdateAppointmentInput {
                schedule_at: req.schedule_at,
                notes: req.notes,
            },
        )
        .await?;

    Ok(Json(UpdatedFieldsResponse {
        message: "Appointment updated",
        updated_fields,
    }))
}

/// PATCH /api/appointments/{id}/status
#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    tag = "appointments",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = AppointmentStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = MessageResponse),
        (status = 400, description = "Unknown status", body = ErrorBody),
        (status = 404, description = "No such appointment", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_appointment_status<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<AppointmentStatusRequest>,
) -> ClinicResult<Json<MessageResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    AppointmentUseCase::new(state.repo.clone())
        .change_status(&AppointmentId::from_db(id), &req.status)
        .await?;

    Ok(Json(MessageResponse {
        message: "Status updated",
    }))
}

/// DELETE /api/appointments/{id}
#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "appointments",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment soft-deleted", body = MessageResponse),
        (status = 404, description = "No such appointment", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_appointment<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<MessageResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    AppointmentUseCase::new(state.repo.clone())
        .delete(&AppointmentId::from_db(id))
        .await?;

    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully",
    }))
}

// ============================================================================
// Medical Records
// ============================================================================

fn record_input(req: MedicalRecordRequest) -> MedicalRecordInput {
    MedicalRecordInput {
        patient_id: req.patient_id,
        user_id: req.user_id,
        diagnosis: req.diagnosis,
        treatment: req.treatment,
    }
}

/// POST /api/medical-records
#[utoipa::path(
    post,
    path = "/api/medical-records",
    tag = "medical-records",
    request_body = MedicalRecordRequest,
    responses(
        (status = 201, description = "Record written", body = CreateMedicalRecordResponse),
        (status = 400, description = "Invalid input, unknown patient or user", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_medical_record<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidJson(req): ValidJson<MedicalRecordRequest>,
) -> ClinicResult<(StatusCode, Json<CreateMedicalRecordResponse>)>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let view = MedicalRecordUseCase::new(state.repo.clone())
        .create(record_input(req))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateMedicalRecordResponse {
            message: "Medical record created",
            medical_record: view.into(),
        }),
    ))
}

/// GET /api/medical-records
#[utoipa::path(
    get,
    path = "/api/medical-records",
    tag = "medical-records",
    params(PageQuery, MedicalRecordListQuery),
    responses(
        (status = 200, description = "One page of records", body = Paginated<MedicalRecordResponse>),
        (status = 400, description = "Invalid paging or filter", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_medical_records<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(query): ValidQuery<MedicalRecordListQuery>,
) -> ClinicResult<Json<Paginated<MedicalRecordResponse>>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let page = page.resolve::<MedicalRecordSortField>()?;
    let filter = MedicalRecordFilter {
        patient_id: present(query.patient_id).map(PatientId::from_db),
        user_id: present(query.user_id).map(UserId::from_db),
    };

    let views = MedicalRecordUseCase::new(state.repo.clone())
        .list(filter, page)
        .await?;

    Ok(Json(views.map(MedicalRecordResponse::from)))
}

/// GET /api/medical-records/{id}
#[utoipa::path(
    get,
    path = "/api/medical-records/{id}",
    tag = "medical-records",
    params(("id" = String, Path, description = "Medical record id")),
    responses(
        (status = 200, description = "The record", body = MedicalRecordResponse),
        (status = 404, description = "No such record", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_medical_record<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<MedicalRecordResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let view = MedicalRecordUseCase::new(state.repo.clone())
        .get(&MedicalRecordId::from_db(id))
        .await?;

    Ok(Json(view.into()))
}

/// PUT /api/medical-records/{id}
#[utoipa::path(
    put,
    path = "/api/medical-records/{id}",
    tag = "medical-records",
    params(("id" = String, Path, description = "Medical record id")),
    request_body = MedicalRecordRequest,
    responses(
        (status = 200, description = "Changed fields", body = UpdatedFieldsResponse),
        (status = 400, description = "Invalid input or nothing changed", body = ErrorBody),
        (status = 404, description = "No such record", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_medical_record<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<MedicalRecordRequest>,
) -> ClinicResult<Json<UpdatedFieldsResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let updated_fields = MedicalRecordUseCase::new(state.repo.clone())
        .update(&MedicalRecordId::from_db(id), record_input(req))
        .await?;

    Ok(Json(UpdatedFieldsResponse {
        message: "Medical record updated",
        updated_fields,
    }))
}

/// DELETE /api/medical-records/{id}
#[utoipa::path(
    delete,
    path = "/api/medical-records/{id}",
    tag = "medical-records",
    params(("id" = String, Path, description = "Medical record id")),
    responses(
        (status = 200, description = "Record soft-deleted", body = MessageResponse),
        (status = 404, description = "No such record", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_medical_record<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<MessageResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    MedicalRecordUseCase::new(state.repo.clone())
        .delete(&MedicalRecordId::from_db(id))
        .await?;

    Ok(Json(MessageResponse {
        message: "Medical record deleted successfully",
    }))
}

// ============================================================================
// Assessments
// ============================================================================

/// POST /api/assessments
#[utoipa::path(
    post,
    path = "/api/assessments",
    tag = "assessments",
    request_body = CreateAssessmentRequest,
    responses(
        (status = 201, description = "Assessment recorded", body = CreateAssessmentResponse),
        (status = 400, description = "Invalid input or unknown patient", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_assessment<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidJson(req): ValidJson<CreateAssessmentRequest>,
) -> ClinicResult<(StatusCode, Json<CreateAssessmentResponse>)>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let view = AssessmentUseCase::new(state.repo.clone())
        .create(AssessmentInput {
            patient_id: req.patient_id,
            date: req.date,
            answers: req.answers,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAssessmentResponse {
            message: "Assessment created",
            data: view.into(),
        }),
    ))
}

/// GET /api/assessments
#[utoipa::path(
    get,
    path = "/api/assessments",
    tag = "assessments",
    params(PageQuery, AssessmentListQuery),
    responses(
        (status = 200, description = "One page of assessments", body = Paginated<AssessmentResponse>),
        (status = 400, description = "Invalid paging or filter", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_assessments<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(query): ValidQuery<AssessmentListQuery>,
) -> ClinicResult<Json<Paginated<AssessmentResponse>>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let page = page.resolve::<AssessmentSortField>()?;
    let filter = AssessmentFilter {
        patient_id: present(query.patient_id).map(PatientId::from_db),
    };

    let views = AssessmentUseCase::new(state.repo.clone())
        .list(filter, page)
        .await?;

    Ok(Json(views.map(AssessmentResponse::from)))
}

/// GET /api/assessments/{id}
#[utoipa::path(
    get,
    path = "/api/assessments/{id}",
    tag = "assessments",
    params(("id" = String, Path, description = "Assessment id")),
    responses(
        (status = 200, description = "The assessment with its latest prediction", body = AssessmentData),
        (status = 404, description = "No such assessment", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_assessment<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<AssessmentData>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let view = AssessmentUseCase::new(state.repo.clone())
        .get(&AssessmentId::from_db(id))
        .await?;

    Ok(Json(AssessmentData { data: view.into() }))
}

/// GET /api/assessments/patient/{patient_id}
#[utoipa::path(
    get,
    path = "/api/assessments/patient/{patient_id}",
    tag = "assessments",
    params(("patient_id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient's assessments, newest first", body = AssessmentListData),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_patient_assessments<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(patient_id): Path<String>,
) -> ClinicResult<Json<AssessmentListData>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let views = AssessmentUseCase::new(state.repo.clone())
        .list_by_patient(&PatientId::from_db(patient_id))
        .await?;

    Ok(Json(AssessmentListData {
        data: views.into_iter().map(AssessmentResponse::from).collect(),
    }))
}

/// PUT /api/assessments/{id}
#[utoipa::path(
    put,
    path = "/api/assessments/{id}",
    tag = "assessments",
    params(("id" = String, Path, description = "Assessment id")),
    request_body = UpdateAssessmentRequest,
    responses(
        (status = 200, description = "Assessment updated", body = UpdateAssessmentResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "No such assessment", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_assessment<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateAssessmentRequest>,
) -> ClinicResult<Json<UpdateAssessmentResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let assessment = AssessmentUseCase::new(state.repo.clone())
        .update(&AssessmentId::from_db(id), req.date, req.answers)
        .await?;

    Ok(Json(UpdateAssessmentResponse {
        message: "Assessment updated",
        data: assessment.into(),
    }))
}

/// DELETE /api/assessments/{id}
#[utoipa::path(
    delete,
    path = "/api/assessments/{id}",
    tag = "assessments",
    params(("id" = String, Path, description = "Assessment id")),
    responses(
        (status = 200, description = "Assessment soft-deleted", body = MessageResponse),
        (status = 404, description = "No such assessment", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_assessment<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<MessageResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    AssessmentUseCase::new(state.repo.clone())
        .delete(&AssessmentId::from_db(id))
        .await?;

    Ok(Json(MessageResponse {
        message: "Assessment deleted successfully",
    }))
}

// ============================================================================
// Predictions
// ============================================================================

/// POST /api/predictions/{assessment_id}
#[utoipa::path(
    post,
    path = "/api/predictions/{id}",
    tag = "predictions",
    params(("id" = String, Path, description = "Assessment id to score")),
    responses(
        (status = 201, description = "Assessment scored and the prediction stored", body = PredictionResponse),
        (status = 404, description = "No such assessment", body = ErrorBody),
        (status = 500, description = "Scoring service failed", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_prediction<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(assessment_id): Path<String>,
) -> ClinicResult<(StatusCode, Json<PredictionResponse>)>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let prediction = PredictionUseCase::new(state.repo.clone(), state.predictor.clone())
        .predict(&AssessmentId::from_db(assessment_id))
        .await?;

    Ok((StatusCode::CREATED, Json(prediction.into())))
}

/// GET /api/predictions
#[utoipa::path(
    get,
    path = "/api/predictions",
    tag = "predictions",
    params(PageQuery, PredictionListQuery),
    responses(
        (status = 200, description = "One page of predictions", body = Paginated<PredictionResponse>),
        (status = 400, description = "Invalid paging or filter", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_predictions<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(query): ValidQuery<PredictionListQuery>,
) -> ClinicResult<Json<Paginated<PredictionResponse>>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let page = page.resolve::<PredictionSortField>()?;
    let filter = PredictionFilter {
        result_label: present(query.result_label),
    };

    let predictions = PredictionUseCase::new(state.repo.clone(), state.predictor.clone())
        .list(filter, page)
        .await?;

    Ok(Json(predictions.map(PredictionResponse::from)))
}

/// GET /api/predictions/{id}
#[utoipa::path(
    get,
    path = "/api/predictions/{id}",
    tag = "predictions",
    params(("id" = String, Path, description = "Prediction id")),
    responses(
        (status = 200, description = "The prediction", body = PredictionResponse),
        (status = 404, description = "No such prediction", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_prediction<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<PredictionResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let prediction = PredictionUseCase::new(state.repo.clone(), state.predictor.clone())
        .get(&id)
        .await?;

    Ok(Json(prediction.into()))
}

/// GET /api/predictions/assessment/{assessment_id}
#[utoipa::path(
    get,
    path = "/api/predictions/assessment/{assessment_id}",
    tag = "predictions",
    params(("assessment_id" = String, Path, description = "Assessment id")),
    responses(
        (status = 200, description = "The assessment's latest prediction", body = PredictionResponse),
        (status = 404, description = "No prediction for this assessment", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_assessment_prediction<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(assessment_id): Path<String>,
) -> ClinicResult<Json<PredictionResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let prediction = PredictionUseCase::new(state.repo.clone(), state.predictor.clone())
        .get_by_assessment(&AssessmentId::from_db(assessment_id))
        .await?;

    Ok(Json(prediction.into()))
}

/// PUT /api/predictions/{id}
#[utoipa::path(
    put,
    path = "/api/predictions/{id}",
    tag = "predictions",
    params(("id" = String, Path, description = "Prediction id")),
    request_body = UpdatePredictionRequest,
    responses(
        (status = 200, description = "Prediction corrected", body = PredictionResponse),
        (status = 400, description = "Probability outside 0..=1", body = ErrorBody),
        (status = 404, description = "No such prediction", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_prediction<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdatePredictionRequest>,
) -> ClinicResult<Json<PredictionResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let prediction = PredictionUseCase::new(state.repo.clone(), state.predictor.clone())
        .update(
            &id,
            UpdatePredictionInput {
                result_label: req.result_label,
                probability_score: req.probability_score,
            },
        )
        .await?;

    Ok(Json(prediction.into()))
}

/// DELETE /api/predictions/{id}
#[utoipa::path(
    delete,
    path = "/api/predictions/{id}",
    tag = "predictions",
    params(("id" = String, Path, description = "Prediction id")),
    responses(
        (status = 200, description = "Prediction soft-deleted", body = MessageResponse),
        (status = 404, description = "No such prediction", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_prediction<R, P>(
    State(state): State<ClinicAppState<R, P>>,
    Path(id): Path<String>,
) -> ClinicResult<Json<MessageResponse>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    PredictionUseCase::new(state.repo.clone(), state.predictor.clone())
        .delete(&id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Prediction deleted successfully",
    }))
}
