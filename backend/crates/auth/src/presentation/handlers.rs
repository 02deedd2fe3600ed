//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::error::app_error::ErrorBody;
use kernel::extract::{ValidJson, ValidQuery};
use kernel::pagination::{PageQuery, Paginated};
use platform::token::TokenService;
use std::sync::Arc;

use crate::application::{
    LoginInput, LoginUseCase, ManageUsersUseCase, RegisterInput, RegisterUseCase, UpdateUserInput,
};
use crate::domain::entity::auth_context::AuthContext;
use crate::domain::repository::{UserFilter, UserRepository, UserSortField};
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
    UpdateUserRequest, UpdateUserResponse, UserListQuery, UserResponse,
};

/// Shared state for user handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/users/register
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input or email already used", body = ErrorBody),
    )
)]
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone());

    let user = use_case
        .execute(RegisterInput {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/users/login
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    )
)]
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: output.token,
        email: output.email.to_string(),
        role: output.role,
    }))
}

// ============================================================================
// User Management
// ============================================================================

/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageQuery, UserListQuery),
    responses(
        (status = 200, description = "One page of accounts", body = Paginated<UserResponse>),
        (status = 400, description = "Invalid paging or filter", body = ErrorBody),
        (status = 403, description = "Admin only", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(query): ValidQuery<UserListQuery>,
) -> AuthResult<Json<Paginated<UserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let page = page.resolve::<UserSortField>()?;
    let role = match query.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => Some(
            UserRole::from_code(raw)
                .ok_or_else(|| AuthError::Validation("Invalid role filter".to_string()))?,
        ),
        None => None,
    };

    let users = ManageUsersUseCase::new(state.repo.clone())
        .list(UserFilter { role }, page)
        .await?;

    Ok(Json(users.map(UserResponse::from)))
}

/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The account", body = UserResponse),
        (status = 404, description = "No such user", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = ManageUsersUseCase::new(state.repo.clone())
        .get(&UserId::from_db(id))
        .await?;

    Ok(Json(user.into()))
}

/// PUT /api/users/{id}
///
/// Callers may update themselves; only an admin may update others or change a role.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = UpdateUserResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 403, description = "Not allowed to change this account", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    caller: AuthContext,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateUserRequest>,
) -> AuthResult<Json<UpdateUserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let input = UpdateUserInput {
        full_name: req.full_name,
        email: req.email,
        password: req.password,
        role: req.role,
    };

    let user = ManageUsersUseCase::new(state.repo.clone())
        .update(&caller, &UserId::from_db(id), input)
        .await?;

    Ok(Json(UpdateUserResponse {
        message: "User Updated",
        user: user.into(),
    }))
}

/// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Account soft-deleted", body = MessageResponse),
        (status = 404, description = "No such user", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    ManageUsersUseCase::new(state.repo.clone())
        .delete(&UserId::from_db(id))
        .await?;

    Ok(Json(MessageResponse {
        message: "User Deleted Successfully",
    }))
}
