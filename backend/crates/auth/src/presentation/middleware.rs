//! Auth Middleware
//!
//! Two stages guard every protected route:
//!
//! 1. [`authenticate`] is layered over the whole protected router. It checks
//!    the bearer token and stores an [`AuthContext`] in request extensions.
//! 2. [`require_roles`] is attached per route (see [`guarded`]) and compares
//!    the caller's role with that route's [`RoleAllowList`].

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum::routing::MethodRouter;
use platform::bearer::extract_bearer;
use platform::token::TokenService;

use crate::domain::entity::auth_context::AuthContext;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::AuthError;

/// Roles admitted to one route
#[derive(Debug, Clone, Copy)]
pub struct RoleAllowList(pub &'static [UserRole]);

impl RoleAllowList {
    pub const ADMIN_ONLY: Self = Self(&[UserRole::Admin]);
    pub const ADMIN_DOCTOR: Self = Self(&[UserRole::Admin, UserRole::Doctor]);
    pub const ADMIN_STAFF: Self = Self(&[UserRole::Admin, UserRole::Staff]);
    pub const ANY_ROLE: Self = Self(&UserRole::ALL);

    pub fn allows(&self, role: UserRole) -> bool {
        self.0.contains(&role)
    }
}

/// Verify the bearer token and attach the caller to the request.
pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_bearer(req.headers()).ok_or(AuthError::MissingToken)?;

    let claims = tokens.verify(token).map_err(|_| AuthError::InvalidToken)?;
    let role = UserRole::from_code(&claims.role).ok_or(AuthError::InvalidClaims)?;

    req.extensions_mut().insert(AuthContext {
        user_id: UserId::from_db(claims.subject),
        role,
    });

    Ok(next.run(req).await)
}

/// Reject callers whose role is not in the route's allow-list.
pub async fn require_roles(
    State(allowed): State<RoleAllowList>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let caller = req
        .extensions()
        .get::<AuthContext>()
        .ok_or(AuthError::NotAuthenticated)?;

    if !allowed.allows(caller.role) {
        tracing::debug!(
            user_id = %caller.user_id,
            role = %caller.role,
            "Role not permitted on route"
        );
        return Err(AuthError::InsufficientRole);
    }

    Ok(next.run(req).await)
}

/// Attach a role allow-list to one method router.
pub fn guarded<S>(allowed: RoleAllowList, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(from_fn_with_state(allowed, require_roles))
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_lists() {
        assert!(RoleAllowList::ADMIN_DOCTOR.allows(UserRole::Doctor));
        assert!(!RoleAllowList::ADMIN_DOCTOR.allows(UserRole::Staff));
        assert!(!RoleAllowList::ADMIN_ONLY.allows(UserRole::Doctor));
        assert!(RoleAllowList::ADMIN_STAFF.allows(UserRole::Staff));
        for role in UserRole::ALL {
            assert!(RoleAllowList::ANY_ROLE.allows(role));
        }
    }
}
