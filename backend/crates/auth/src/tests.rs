//! Cross-module tests for the auth crate
//!
//! Use cases run against the in-memory repository; the router is driven
//! with `tower::ServiceExt::oneshot`.

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use chrono::Duration;
    use platform::token::TokenService;

    use crate::application::{
        LoginInput, LoginUseCase, ManageUsersUseCase, RegisterInput, RegisterUseCase,
        UpdateUserInput,
    };
    use crate::domain::entity::auth_context::AuthContext;
    use crate::domain::entity::user::User;
    use crate::domain::value_object::user_role::UserRole;
    use crate::error::AuthError;
    use crate::infra::InMemoryUserRepository;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(b"test-secret", Duration::hours(24)).unwrap())
    }

    async fn register(repo: &Arc<InMemoryUserRepository>, email: &str, role: &str) -> User {
        RegisterUseCase::new(repo.clone())
            .execute(RegisterInput {
                full_name: "Dewi Lestari".to_string(),
                email: email.to_string(),
                password: "rahasia123".to_string(),
                role: role.to_string(),
            })
            .await
            .unwrap()
    }

    fn login_input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let tokens = tokens();
        let user = register(&repo, "Dewi@Klinik.id", "doctor").await;

        assert_eq!(user.email.as_str(), "dewi@klinik.id");
        assert!(user.user_id.as_str().starts_with("doctor-001-"));
        assert_ne!(user.password_hash.as_phc_string(), "rahasia123");

        let output = LoginUseCase::new(repo.clone(), tokens.clone())
            .execute(login_input("dewi@klinik.id", "rahasia123"))
            .await
            .unwrap();

        assert_eq!(output.role, UserRole::Doctor);
        let claims = tokens.verify(&output.token).unwrap();
        assert_eq!(claims.subject, user.user_id.as_str());
        assert_eq!(claims.role, "doctor");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let repo = Arc::new(InMemoryUserRepository::new());
        register(&repo, "dewi@klinik.id", "staff").await;
        let use_case = LoginUseCase::new(repo.clone(), tokens());

        let wrong_password = use_case
            .execute(login_input("dewi@klinik.id", "salah-sandi"))
            .await;
        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));

        let unknown = use_case
            .execute(login_input("nobody@klinik.id", "rahasia123"))
            .await;
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_and_bad_role() {
        let repo = Arc::new(InMemoryUserRepository::new());
        register(&repo, "dewi@klinik.id", "staff").await;

        let use_case = RegisterUseCase::new(repo.clone());
        let duplicate = use_case
            .execute(RegisterInput {
                full_name: "Other".to_string(),
                email: "DEWI@klinik.id".to_string(),
                password: "rahasia123".to_string(),
                role: "doctor".to_string(),
            })
            .await;
        assert!(matches!(duplicate, Err(AuthError::EmailTaken)));

        let bad_role = use_case
            .execute(RegisterInput {
                full_name: "Other".to_string(),
                email: "other@klinik.id".to_string(),
                password: "rahasia123".to_string(),
                role: "nurse".to_string(),
            })
            .await;
        assert!(matches!(bad_role, Err(AuthError::Validation(_))));

        let short_password = use_case
            .execute(RegisterInput {
                full_name: "Other".to_string(),
                email: "other@klinik.id".to_string(),
                password: "123".to_string(),
                role: "staff".to_string(),
            })
            .await;
        assert!(matches!(short_password, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sequences_are_per_role() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let first = register(&repo, "a@klinik.id", "doctor").await;
        let admin = register(&repo, "b@klinik.id", "admin").await;
        let second = register(&repo, "c@klinik.id", "doctor").await;

        assert!(first.user_id.as_str().starts_with("doctor-001-"));
        assert!(admin.user_id.as_str().starts_with("admin-001-"));
        assert!(second.user_id.as_str().starts_with("doctor-002-"));
    }

    #[tokio::test]
    async fn test_update_rules() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let doctor = register(&repo, "doc@klinik.id", "doctor").await;
        let staff = register(&repo, "staff@klinik.id", "staff").await;
        let admin = register(&repo, "admin@klinik.id", "admin").await;
        let manage = ManageUsersUseCase::new(repo.clone());

        let as_doctor = AuthContext {
            user_id: doctor.user_id.clone(),
            role: UserRole::Doctor,
        };
        let as_admin = AuthContext {
            user_id: admin.user_id.clone(),
            role: UserRole::Admin,
        };

        let renamed = manage
            .update(
                &as_doctor,
                &doctor.user_id,
                UpdateUserInput {
                    full_name: Some("Dr. Budi".to_string()),
                    email: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.full_name, "Dr. Budi");
        assert_eq!(renamed.email.as_str(), "doc@klinik.id");

        let other = manage
            .update(&as_doctor, &staff.user_id, UpdateUserInput::default())
            .await;
        assert!(matches!(other, Err(AuthError::Forbidden(_))));

        let promote_self = manage
            .update(
                &as_doctor,
                &doctor.user_id,
                UpdateUserInput {
                    role: Some("admin".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(promote_self, Err(AuthError::Forbidden(_))));

        let taken = manage
            .update(
                &as_admin,
                &staff.user_id,
                UpdateUserInput {
                    email: Some("doc@klinik.id".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(taken, Err(AuthError::EmailTaken)));

        let promoted = manage
            .update(
                &as_admin,
                &staff.user_id,
                UpdateUserInput {
                    role: Some("doctor".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(promoted.role, UserRole::Doctor);
    }

    #[tokio::test]
    async fn test_soft_delete_frees_email() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = register(&repo, "dewi@klinik.id", "staff").await;
        let manage = ManageUsersUseCase::new(repo.clone());

        manage.delete(&user.user_id).await.unwrap();

        assert!(matches!(
            manage.get(&user.user_id).await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            manage.delete(&user.user_id).await,
            Err(AuthError::UserNotFound)
        ));

        let again = register(&repo, "dewi@klinik.id", "staff").await;
        assert!(again.user_id.as_str().starts_with("staff-002-"));
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::Duration;
    use kernel::routing::not_found;
    use platform::token::TokenService;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::infra::InMemoryUserRepository;
    use crate::presentation::router::user_router_generic;

    fn app() -> (Router, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(b"test-secret", Duration::hours(24)).unwrap());
        let router = Router::new()
            .nest(
                "/api",
                user_router_generic(InMemoryUserRepository::new(), tokens.clone()),
            )
            .fallback(not_found);
        (router, tokens)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_and_login_over_http() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/users/register",
                json!({
                    "fullName": "Admin Klinik",
                    "email": "admin@klinik.id",
                    "password": "rahasia123",
                    "role": "admin"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User Registered");
        assert_eq!(body["user"]["role"], "admin");
        assert!(body["user"].get("password").is_none());

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/users/login",
                json!({ "email": "admin@klinik.id", "password": "rahasia123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, get_with_token("/api/users", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["email"], "admin@klinik.id");
    }

    #[tokio::test]
    async fn test_wrong_password_is_401() {
        let (app, _) = app();
        send(
            &app,
            json_request(
                "POST",
                "/api/users/register",
                json!({
                    "fullName": "Staff",
                    "email": "staff@klinik.id",
                    "password": "rahasia123",
                    "role": "staff"
                }),
            ),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/users/login",
                json!({ "email": "staff@klinik.id", "password": "bukan-ini" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid Credentials");
    }

    #[tokio::test]
    async fn test_gate_rejects_missing_and_invalid_tokens() {
        let (app, _) = app();

        let req = Request::builder().uri("/api/users").body(Body::empty()).unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing or Invalid Authorization Header");

        let (status, body) = send(&app, get_with_token("/api/users", "not.a.jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid or Expired Token");
    }

    #[tokio::test]
    async fn test_gate_checks_role() {
        let (app, tokens) = app();

        let staff = tokens.issue("staff-001-aaaaaaaa", "staff").unwrap();
        let (status, body) = send(&app, get_with_token("/api/users", &staff)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden - Insufficient Role");

        let unknown = tokens.issue("x-001-aaaaaaaa", "janitor").unwrap();
        let (status, body) = send(&app, get_with_token("/api/users", &unknown)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid Token Claims");

        let admin = tokens.issue("admin-001-aaaaaaaa", "admin").unwrap();
        let (status, _) = send(&app, get_with_token("/api/users", &admin)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let (app, tokens) = app();
        let issued = chrono::Utc::now() - Duration::hours(25);
        let token = tokens
            .issue_at("admin-001-aaaaaaaa", "admin", issued)
            .unwrap();

        let (status, _) = send(&app, get_with_token("/api/users", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_sort_field_is_400() {
        let (app, tokens) = app();
        let admin = tokens.issue("admin-001-aaaaaaaa", "admin").unwrap();

        let (status, body) = send(&app, get_with_token("/api/users?sort=password_hash", &admin)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid sort field");
    }

    #[tokio::test]
    async fn test_user_list_accepts_trailing_slash() {
        let (app, tokens) = app();
        let admin = tokens.issue("admin-001-aaaaaaaa", "admin").unwrap();

        let (status, body) = send(&app, get_with_token("/api/users/", &admin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);

        let staff = tokens.issue("staff-001-aaaaaaaa", "staff").unwrap();
        let (status, _) = send(&app, get_with_token("/api/users/", &staff)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (app, tokens) = app();
        let admin = tokens.issue("admin-001-aaaaaaaa", "admin").unwrap();

        let (status, body) = send(&app, get_with_token("/api/users/admin-001-aaaaaaaa/profile", &admin)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Route not found");
        assert_eq!(body["title"], "Not Found");
    }
}
