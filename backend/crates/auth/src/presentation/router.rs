//! User Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use kernel::routing::RouterExt;
use platform::token::TokenService;
use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{RoleAllowList, authenticate, guarded};

/// Create the user router with PostgreSQL repository
///
/// Routes live under `/users`; nest the router under `/api`.
pub fn user_router(repo: PgUserRepository, tokens: Arc<TokenService>) -> Router {
    user_router_generic(repo, tokens)
}

/// Create a generic user router for any repository implementation
///
/// `register` and `login` are public; everything else sits behind the
/// bearer-token gate.
pub fn user_router_generic<R>(repo: R, tokens: Arc<TokenService>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens: tokens.clone(),
    };

    let protected = Router::new()
        .route_collection(
            "/users",
            guarded(RoleAllowList::ADMIN_ONLY, get(handlers::list_users::<R>)),
        )
        .route(
            "/users/{id}",
            guarded(RoleAllowList::ADMIN_ONLY, get(handlers::get_user::<R>))
                .merge(guarded(
                    RoleAllowList::ADMIN_ONLY,
                    delete(handlers::delete_user::<R>),
                ))
                .merge(guarded(
                    RoleAllowList::ANY_ROLE,
                    put(handlers::update_user::<R>),
                )),
        )
        .layer(from_fn_with_state(tokens, authenticate));

    Router::new()
        .route("/users/register", post(handlers::register::<R>))
        .route("/users/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}
