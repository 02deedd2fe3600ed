//! OpenAPI document for the clinic routes

use kernel::openapi::BearerSecurity;
use utoipa::OpenApi;

use crate::presentation::handlers as h;

#[derive(OpenApi)]
#[openapi(
    paths(
        h::create_patient,
        h::list_patients,
        h::get_patient,
        h::update_patient,
        h::delete_patient,
        h::create_appointment,
        h::list_appointments,
        h::get_appointment,
        h::list_patient_appointments,
        h::list_user_appointments,
        h::update_appointment,
        h::change_appointment_status,
        h::delete_appointment,
        h::create_medical_record,
        h::list_medical_records,
        h::get_medical_record,
        h::update_medical_record,
        h::delete_medical_record,
        h::create_assessment,
        h::list_assessments,
        h::get_assessment,
        h::list_patient_assessments,
        h::update_assessment,
        h::delete_assessment,
        h::create_prediction,
        h::list_predictions,
        h::get_prediction,
        h::get_assessment_prediction,
        h::update_prediction,
        h::delete_prediction,
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "patients", description = "Patient registry"),
        (name = "appointments", description = "Scheduling"),
        (name = "medical-records", description = "Diagnoses and treatments"),
        (name = "assessments", description = "Questionnaire results"),
        (name = "predictions", description = "Risk scoring of assessments"),
    )
)]
pub struct ClinicApi;
