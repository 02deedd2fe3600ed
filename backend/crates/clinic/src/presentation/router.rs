//! Clinic Router
//!
//! Every clinic route sits behind the bearer-token gate. Role allow-lists
//! are attached per method. Collections answer with or without a trailing
//! slash, and the legacy segment names (`statusAppoinment`,
//! `appoinmentPatient`, `appoinmentUser`, `byPatient`) route to the same
//! handlers as their current names.

use std::sync::Arc;

use auth::middleware::{RoleAllowList as Roles, authenticate, guarded};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
};
use kernel::routing::RouterExt;
use platform::token::TokenService;

use crate::domain::repository::ClinicStore;
use crate::domain::service::PredictionService;
use crate::infra::postgres::PgClinicRepository;
use crate::infra::prediction::HttpPredictionClient;
use crate::presentation::handlers::{self as h, ClinicAppState};

/// Create the clinic router with PostgreSQL and the HTTP scoring client.
///
/// Nest it under `/api`.
pub fn clinic_router(
    repo: PgClinicRepository,
    predictor: HttpPredictionClient,
    tokens: Arc<TokenService>,
) -> Router {
    clinic_router_generic(repo, predictor, tokens)
}

/// Create a generic clinic router for any store and scoring backend
pub fn clinic_router_generic<R, P>(repo: R, predictor: P, tokens: Arc<TokenService>) -> Router
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let state = ClinicAppState {
        repo: Arc::new(repo),
        predictor: Arc::new(predictor),
    };

    Router::new()
        .merge(patient_routes::<R, P>())
        .merge(appointment_routes::<R, P>())
        .merge(medical_record_routes::<R, P>())
        .merge(assessment_routes::<R, P>())
        .merge(prediction_routes::<R, P>())
        .layer(from_fn_with_state(tokens, authenticate))
        .with_state(state)
}

fn patient_routes<R, P>() -> Router<ClinicAppState<R, P>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    Router::new()
        .route_collection(
            "/patients",
            guarded(Roles::ANY_ROLE, post(h::create_patient::<R, P>))
                .merge(guarded(Roles::ADMIN_STAFF, get(h::list_patients::<R, P>))),
        )
        .route(
            "/patients/{id}",
            guarded(Roles::ADMIN_STAFF, get(h::get_patient::<R, P>))
                .merge(guarded(Roles::ADMIN_STAFF, put(h::update_patient::<R, P>)))
                .merge(guarded(Roles::ADMIN_ONLY, delete(h::delete_patient::<R, P>))),
        )
}

fn appointment_routes<R, P>() -> Router<ClinicAppState<R, P>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let change_status = guarded(
        Roles::ADMIN_DOCTOR,
        patch(h::change_appointment_status::<R, P>),
    );
    let by_patient = guarded(Roles::ANY_ROLE, get(h::list_patient_appointments::<R, P>));
    let by_user = guarded(Roles::ADMIN_DOCTOR, get(h::list_user_appointments::<R, P>));

    Router::new()
        .route_collection(
            "/appointments",
            guarded(Roles::ANY_ROLE, post(h::create_appointment::<R, P>))
                .merge(guarded(Roles::ADMIN_STAFF, get(h::list_appointments::<R, P>))),
        )
        .route(
            "/appointments/{id}",
            guarded(Roles::ANY_ROLE, get(h::get_appointment::<R, P>))
                .merge(guarded(Roles::ADMIN_DOCTOR, put(h::update_appointment::<R, P>)))
                .merge(guarded(Roles::ADMIN_ONLY, delete(h::delete_appointment::<R, P>))),
        )
        .route("/appointments/{id}/status", change_status.clone())
        .route("/appointments/{id}/statusAppoinment", change_status)
        .route("/appointments/patient/{patient_id}", by_patient.clone())
        .route("/appointments/appoinmentPatient/{patient_id}", by_patient)
        .route("/appointments/user/{user_id}", by_user.clone())
        .route("/appointments/appoinmentUser/{user_id}", by_user)
}

fn medical_record_routes<R, P>() -> Router<ClinicAppState<R, P>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    Router::new()
        .route_collection(
            "/medical-records",
            guarded(Roles::ANY_ROLE, post(h::create_medical_record::<R, P>))
                .merge(guarded(Roles::ANY_ROLE, get(h::list_medical_records::<R, P>))),
        )
        .route(
            "/medical-records/{id}",
            guarded(Roles::ANY_ROLE, get(h::get_medical_record::<R, P>))
                .merge(guarded(Roles::ADMIN_DOCTOR, put(h::update_medical_record::<R, P>)))
                .merge(guarded(Roles::ADMIN_ONLY, delete(h::delete_medical_record::<R, P>))),
        )
}

fn assessment_routes<R, P>() -> Router<ClinicAppState<R, P>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    let by_patient = guarded(Roles::ANY_ROLE, get(h::list_patient_assessments::<R, P>));

    Router::new()
        .route_collection(
            "/assessments",
            guarded(Roles::ANY_ROLE, post(h::create_assessment::<R, P>))
                .merge(guarded(Roles::ADMIN_STAFF, get(h::list_assessments::<R, P>))),
        )
        .route(
            "/assessments/{id}",
            guarded(Roles::ANY_ROLE, get(h::get_assessment::<R, P>))
                .merge(guarded(Roles::ADMIN_DOCTOR, put(h::update_assessment::<R, P>)))
                .merge(guarded(Roles::ADMIN_ONLY, delete(h::delete_assessment::<R, P>))),
        )
        .route("/assessments/patient/{patient_id}", by_patient.clone())
        .route("/assessments/byPatient/{patient_id}", by_patient)
}

fn prediction_routes<R, P>() -> Router<ClinicAppState<R, P>>
where
    R: ClinicStore,
    P: PredictionService + Send + Sync + 'static,
{
    Router::new()
        .route_collection(
            "/predictions",
            guarded(Roles::ANY_ROLE, get(h::list_predictions::<R, P>)),
        )
        // POST takes an assessment id; the other methods take a prediction id.
        .route(
            "/predictions/{id}",
            guarded(Roles::ANY_ROLE, get(h::get_prediction::<R, P>))
                .merge(guarded(Roles::ADMIN_DOCTOR, post(h::create_prediction::<R, P>)))
                .merge(guarded(Roles::ADMIN_ONLY, put(h::update_prediction::<R, P>)))
                .merge(guarded(Roles::ADMIN_ONLY, delete(h::delete_prediction::<R, P>))),
        )
        .route(
            "/predictions/assessment/{assessment_id}",
            guarded(Roles::ANY_ROLE, get(h::get_assessment_prediction::<R, P>)),
        )
}
