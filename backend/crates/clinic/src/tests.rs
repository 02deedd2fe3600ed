//! Cross-module tests for the clinic crate
//!
//! The router runs against the in-memory store and a canned scoring
//! backend; the HTTP scoring client is pointed at a throwaway local server.

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use auth::models::{UserId, UserRole};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::Duration;
    use kernel::routing::not_found;
    use platform::token::TokenService;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use utoipa::OpenApi;

    use super::prediction_client_tests::serve;
    use crate::domain::entity::StaffSummary;
    use crate::domain::service::{PredictionError, PredictionOutcome, PredictionService};
    use crate::domain::value_object::AssessmentFeatures;
    use crate::infra::{HttpPredictionClient, InMemoryClinicRepository};
    use crate::presentation::openapi::ClinicApi;
    use crate::presentation::router::clinic_router_generic;

    const DOCTOR_ID: &str = "doctor-001-aaaaaaaa";

    /// Always answers `low_risk` at 0.12
    struct CannedPredictor;

    impl PredictionService for CannedPredictor {
        async fn predict(
            &self,
            _features: &AssessmentFeatures,
        ) -> Result<PredictionOutcome, PredictionError> {
            Ok(PredictionOutcome {
                label: "low_risk".to_string(),
                probability: 0.12,
            })
        }
    }

    /// Scoring service that is down
    struct FailingPredictor;

    impl PredictionService for FailingPredictor {
        async fn predict(
            &self,
            _features: &AssessmentFeatures,
        ) -> Result<PredictionOutcome, PredictionError> {
            Err(PredictionError::Upstream { status: 503 })
        }
    }

    struct TestApp {
        router: Router,
        tokens: Arc<TokenService>,
    }

    impl TestApp {
        fn token(&self, subject: &str, role: &str) -> String {
            self.tokens.issue(subject, role).unwrap()
        }

        fn admin(&self) -> String {
            self.token("admin-001-aaaaaaaa", "admin")
        }

        fn doctor(&self) -> String {
            self.token(DOCTOR_ID, "doctor")
        }

        fn staff(&self) -> String {
            self.token("staff-001-aaaaaaaa", "staff")
        }
    }

    async fn app_with<P>(predictor: P) -> TestApp
    where
        P: PredictionService + Send + Sync + 'static,
    {
        let tokens = Arc::new(TokenService::new(b"test-secret", Duration::hours(24)).unwrap());
        let repo = InMemoryClinicRepository::new();
        repo.add_staff(StaffSummary {
            id: UserId::from_db(DOCTOR_ID),
            full_name: "dr. Rina Wijaya".to_string(),
            role: UserRole::Doctor,
            email: "rina@klinik.id".to_string(),
        })
        .await;

        let router = Router::new()
            .nest(
                "/api",
                clinic_router_generic(repo, predictor, tokens.clone()),
            )
            .fallback(not_found);
        TestApp { router, tokens }
    }

    async fn app() -> TestApp {
        app_with(CannedPredictor).await
    }

    async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bare_request(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    fn patient_body(nik: &str) -> Value {
        json!({
            "fullName": "Andi Saputra",
            "nik": nik,
            "birthDate": "1994-05-17",
            "gender": "male",
            "phone": "08123456789",
            "address": "Jl. Merdeka No. 10, Bandung",
            "emergencyContact": "08198765432"
        })
    }

    async fn create_patient(app: &TestApp, nik: &str) -> String {
        let (status, body) = send(
            app,
            json_request("POST", "/api/patients", &app.admin(), patient_body(nik)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["patient"]["id"].as_str().unwrap().to_string()
    }

    async fn create_appointment(app: &TestApp, patient_id: &str) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/appointments",
                &app.staff(),
                json!({
                    "patientId": patient_id,
                    "userId": DOCTOR_ID,
                    "scheduleAt": "2026-11-02T09:00:00Z",
                    "notes": "Konsultasi awal"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["appointment"]["id"].as_str().unwrap().to_string()
    }

    async fn create_assessment(app: &TestApp, patient_id: &str) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/assessments",
                &app.doctor(),
                json!({
                    "patientId": patient_id,
                    "date": "2026-10-18T08:30:00Z",
                    "answers": { "anxiety_share": 4.1, "DALYs": 1520.5, "suicide_rate": null }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Assessment created");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_duplicate_nik_is_rejected() {
        let app = app().await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/patients", &app.doctor(), patient_body("3273011705940001")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Patient created successfully");
        assert!(body["patient"]["id"].as_str().unwrap().starts_with("patient-001-"));

        let (status, body) = send(
            &app,
            json_request("POST", "/api/patients", &app.staff(), patient_body("3273011705940001")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "NIK already registered");
    }

    #[tokio::test]
    async fn test_deleted_patient_frees_nik() {
        let app = app().await;
        let id = create_patient(&app, "3273011705940002").await;

        let (status, body) = send(
            &app,
            bare_request("DELETE", &format!("/api/patients/{id}"), &app.admin()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Patient deleted successfully");

        let (status, _) = send(
            &app,
            bare_request("GET", &format!("/api/patients/{id}"), &app.admin()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let again = create_patient(&app, "3273011705940002").await;
        assert!(again.starts_with("patient-002-"));
    }

    #[tokio::test]
    async fn test_patient_routes_follow_role_lists() {
        let app = app().await;
        let id = create_patient(&app, "3273011705940003").await;

        let (status, _) = send(&app, bare_request("GET", "/api/patients", &app.staff())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, bare_request("GET", "/api/patients", &app.doctor())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden - Insufficient Role");

        let (status, _) = send(
            &app,
            bare_request("DELETE", &format!("/api/patients/{id}"), &app.staff()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            Request::builder()
                .uri("/api/patients")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_patient_list_search_and_filter() {
        let app = app().await;
        create_patient(&app, "3273011705940004").await;
        let mut other = patient_body("3273011705940005");
        other["fullName"] = json!("Siti Rahma");
        other["gender"] = json!("female");
        send(&app, json_request("POST", "/api/patients", &app.admin(), other)).await;

        let (status, body) = send(
            &app,
            bare_request("GET", "/api/patients?search=siti&limit=5", &app.admin()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["limit"], 5);
        assert_eq!(body["data"][0]["fullName"], "Siti Rahma");

        let (_, body) = send(
            &app,
            bare_request("GET", "/api/patients?gender=male", &app.admin()),
        )
        .await;
        assert_eq!(body["total"], 1);

        let (status, body) = send(
            &app,
            bare_request("GET", "/api/patients?gender=robot", &app.admin()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Gender must be one of male, female, other");
    }

    #[tokio::test]
    async fn test_appointment_lifecycle() {
        let app = app().await;
        let patient_id = create_patient(&app, "3273011705940006").await;
        let id = create_appointment(&app, &patient_id).await;

        let (status, body) = send(
            &app,
            bare_request("GET", &format!("/api/appointments/{id}"), &app.doctor()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["patient"]["fullName"], "Andi Saputra");
        assert_eq!(body["user"]["role"], "doctor");

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/appointments/{id}"),
                &app.doctor(),
                json!({ "notes": "Dipindah ke sore" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updatedFields"][0]["field"], "notes");

        let (status, body) = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/appointments/{id}/status"),
                &app.admin(),
                json!({ "status": "done" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Status updated");

        let (status, body) = send(
            &app,
            bare_request(
                "GET",
                &format!("/api/appointments/patient/{patient_id}"),
                &app.staff(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["status"], "done");
        assert_eq!(body[0]["notes"], "Dipindah ke sore");

        let (status, body) = send(
            &app,
            bare_request("GET", &format!("/api/appointments/user/{DOCTOR_ID}"), &app.doctor()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_appointment_update_is_400() {
        let app = app().await;
        let patient_id = create_patient(&app, "3273011705940007").await;
        let id = create_appointment(&app, &patient_id).await;

        let (status, body) = send(
            &app,
            json_request("PUT", &format!("/api/appointments/{id}"), &app.admin(), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No fields to update");

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/appointments/{id}"),
                &app.staff(),
                json!({ "notes": "x" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_appointment_requires_known_patient_and_user() {
        let app = app().await;
        let patient_id = create_patient(&app, "3273011705940008").await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/appointments",
                &app.admin(),
                json!({
                    "patientId": "patient-999-zzzzzzzz",
                    "userId": DOCTOR_ID,
                    "scheduleAt": "2026-11-02T09:00:00Z"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Patient not found");

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/appointments",
                &app.admin(),
                json!({
                    "patientId": patient_id,
                    "userId": "doctor-404-zzzzzzzz",
                    "scheduleAt": "2026-11-02T09:00:00Z"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn test_medical_record_update_reports_changed_fields() {
        let app = app().await;
        let patient_id = create_patient(&app, "3273011705940009").await;
        let record = json!({
            "patientId": patient_id,
            "userId": DOCTOR_ID,
            "diagnosis": "Gangguan kecemasan umum",
            "treatment": "CBT mingguan"
        });

        let (status, body) = send(
            &app,
            json_request("POST", "/api/medical-records", &app.doctor(), record.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["medicalRecord"]["user"]["fullName"], "dr. Rina Wijaya");
        let id = body["medicalRecord"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request("PUT", &format!("/api/medical-records/{id}"), &app.doctor(), record.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No fields to update");

        let mut changed = record;
        changed["treatment"] = json!("CBT dua kali seminggu");
        let (status, body) = send(
            &app,
            json_request("PUT", &format!("/api/medical-records/{id}"), &app.admin(), changed),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["updatedFields"],
            json!([{ "field": "treatment", "value": "CBT dua kali seminggu" }])
        );
    }

    #[tokio::test]
    async fn test_prediction_is_stored_and_linked_to_assessment() {
        let app = app().await;
        let patient_id = create_patient(&app, "3273011705940010").await;
        let assessment_id = create_assessment(&app, &patient_id).await;

        let (status, body) = send(
            &app,
            bare_request("GET", &format!("/api/assessments/{assessment_id}"), &app.staff()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["prediction"].is_null());

        let (status, body) = send(
            &app,
            bare_request("POST", &format!("/api/predictions/{assessment_id}"), &app.doctor()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["resultLabel"], "low_risk");
        assert_eq!(body["probabilityScore"], 0.12);
        let prediction_id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            bare_request(
                "GET",
                &format!("/api/predictions/assessment/{assessment_id}"),
                &app.staff(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], prediction_id.as_str());
        assert_eq!(body["assessmentId"], assessment_id.as_str());

        let (_, body) = send(
            &app,
            bare_request("GET", &format!("/api/assessments/{assessment_id}"), &app.staff()),
        )
        .await;
        assert_eq!(body["data"]["prediction"]["resultLabel"], "low_risk");
    }

    #[tokio::test]
    async fn test_prediction_errors() {
        let app = app().await;

        let (status, body) = send(
            &app,
            bare_request("POST", "/api/predictions/assessment-404-zzzzzzzz", &app.admin()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Assessment not found");

        let (status, _) = send(
            &app,
            bare_request("POST", "/api/predictions/assessment-404-zzzzzzzz", &app.staff()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            bare_request("GET", "/api/predictions/not-a-uuid", &app.staff()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Prediction not found");
    }

    #[tokio::test]
    async fn test_scoring_failure_is_500() {
        let app = app_with(FailingPredictor).await;
        let patient_id = create_patient(&app, "3273011705940011").await;
        let assessment_id = create_assessment(&app, &patient_id).await;

        let (status, body) = send(
            &app,
            bare_request("POST", &format!("/api/predictions/{assessment_id}"), &app.admin()),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Prediction service returned an error status");
    }

    #[tokio::test]
    async fn test_prediction_correction_is_range_checked() {
        let app = app().await;
        let patient_id = create_patient(&app, "3273011705940012").await;
        let assessment_id = create_assessment(&app, &patient_id).await;
        let (_, body) = send(
            &app,
            bare_request("POST", &format!("/api/predictions/{assessment_id}"), &app.admin()),
        )
        .await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/predictions/{id}"),
                &app.admin(),
                json!({ "resultLabel": "high_risk", "probabilityScore": 1.4 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "probabilityScore must be between 0 and 1");

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/predictions/{id}"),
                &app.admin(),
                json!({ "resultLabel": "high_risk", "probabilityScore": 0.91 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resultLabel"], "high_risk");

        let (_, body) = send(
            &app,
            bare_request("GET", "/api/predictions?resultLabel=high_risk", &app.doctor()),
        )
        .await;
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_collections_accept_trailing_slash() {
        let app = app().await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/patients/", &app.admin(), patient_body("3273011705940020")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let patient_id = body["patient"]["id"].as_str().unwrap().to_string();
        create_appointment(&app, &patient_id).await;

        let (status, body) = send(&app, bare_request("GET", "/api/patients/", &app.admin())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);

        let (status, body) =
            send(&app, bare_request("GET", "/api/appointments/", &app.admin())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);

        for uri in ["/api/medical-records/", "/api/assessments/", "/api/predictions/"] {
            let (status, body) = send(&app, bare_request("GET", uri, &app.admin())).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["total"], 0, "{uri}");
        }

        // Role lists still apply on the slashed form.
        let (status, _) = send(&app, bare_request("GET", "/api/patients/", &app.doctor())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_legacy_appointment_paths() {
        let app = app().await;
        let patient_id = create_patient(&app, "3273011705940021").await;
        let id = create_appointment(&app, &patient_id).await;

        let (status, _) = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/appointments/{id}/statusAppoinment"),
                &app.staff(),
                json!({ "status": "done" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/appointments/{id}/statusAppoinment"),
                &app.doctor(),
                json!({ "status": "done" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Status updated");

        let (status, body) = send(
            &app,
            bare_request(
                "GET",
                &format!("/api/appointments/appoinmentPatient/{patient_id}"),
                &app.staff(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], id.as_str());
        assert_eq!(body[0]["status"], "done");

        let (status, body) = send(
            &app,
            bare_request(
                "GET",
                &format!("/api/appointments/appoinmentUser/{DOCTOR_ID}"),
                &app.doctor(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            bare_request(
                "GET",
                &format!("/api/appointments/appoinmentUser/{DOCTOR_ID}"),
                &app.staff(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_legacy_assessment_by_patient_path() {
        let app = app().await;
        let patient_id = create_patient(&app, "3273011705940022").await;
        let assessment_id = create_assessment(&app, &patient_id).await;

        let (status, body) = send(
            &app,
            bare_request(
                "GET",
                &format!("/api/assessments/byPatient/{patient_id}"),
                &app.doctor(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], assessment_id.as_str());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = app().await;

        let (status, body) =
            send(&app, bare_request("GET", "/api/appointments/x/notes", &app.admin())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Route not found");
        assert_eq!(body["status"], 404);
        assert_eq!(body["title"], "Not Found");
    }

    #[tokio::test]
    async fn test_prediction_through_http_scoring_client() {
        let upstream = Router::new().route(
            "/predict",
            post(|Json(features): Json<Value>| async move {
                // The stored answers arrive as features, null read as 0.
                if features["DALYs"] != 1520.5 || features["suicide_rate"] != 0.0 {
                    return Err(StatusCode::UNPROCESSABLE_ENTITY);
                }
                Ok(Json(json!({ "resultLabel": "low_risk", "probabilityScore": 0.12 })))
            }),
        );
        let client = HttpPredictionClient::new(serve(upstream).await).unwrap();
        let app = app_with(client).await;
        let patient_id = create_patient(&app, "3273011705940023").await;
        let assessment_id = create_assessment(&app, &patient_id).await;

        let (status, body) = send(
            &app,
            bare_request("POST", &format!("/api/predictions/{assessment_id}"), &app.doctor()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["assessmentId"], assessment_id.as_str());

        let (status, body) = send(
            &app,
            bare_request(
                "GET",
                &format!("/api/predictions/assessment/{assessment_id}"),
                &app.staff(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resultLabel"], "low_risk");
        assert_eq!(body["probabilityScore"], 0.12);
    }

    #[test]
    fn test_openapi_document_lists_clinic_routes() {
        let doc = serde_json::to_value(ClinicApi::openapi()).unwrap();
        let paths = &doc["paths"];

        let predict = &paths["/api/predictions/{id}"]["post"];
        assert!(predict.is_object());
        assert_eq!(
            predict["responses"]["201"]["description"],
            "Assessment scored and the prediction stored"
        );
        assert_eq!(predict["security"][0]["bearer_auth"], json!([]));

        assert!(paths["/api/appointments/{id}/status"]["patch"].is_object());
        assert!(paths["/api/predictions/assessment/{assessment_id}"]["get"].is_object());
        assert!(doc["components"]["schemas"]["PatientResponse"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}

#[cfg(test)]
mod prediction_client_tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use crate::domain::service::{PredictionError, PredictionService};
    use crate::domain::value_object::AssessmentFeatures;
    use crate::infra::HttpPredictionClient;

    pub(super) async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/predict")
    }

    fn features() -> AssessmentFeatures {
        AssessmentFeatures {
            dalys: 0.5,
            anxiety_share: 4.1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_success_maps_response() {
        // Echoes the DALYs feature back as the score.
        let router = Router::new().route(
            "/predict",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "resultLabel": "moderate_risk",
                    "probabilityScore": body["DALYs"]
                }))
            }),
        );
        let client = HttpPredictionClient::new(serve(router).await).unwrap();

        let outcome = client.predict(&features()).await.unwrap();
        assert_eq!(outcome.label, "moderate_risk");
        assert_eq!(outcome.probability, 0.5);
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let router = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
        );
        let client = HttpPredictionClient::new(serve(router).await).unwrap();

        let err = client.predict(&features()).await.unwrap_err();
        assert!(matches!(err, PredictionError::Upstream { status: 503 }));
    }

    #[tokio::test]
    async fn test_garbled_body_is_invalid_response() {
        let router = Router::new().route("/predict", post(|| async { "not json" }));
        let client = HttpPredictionClient::new(serve(router).await).unwrap();

        let err = client.predict(&features()).await.unwrap_err();
        assert!(matches!(err, PredictionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            HttpPredictionClient::with_timeout(format!("http://{addr}/predict"), Duration::from_secs(1))
                .unwrap();

        let err = client.predict(&features()).await.unwrap_err();
        assert!(matches!(err, PredictionError::Unreachable(_)));
    }
}
