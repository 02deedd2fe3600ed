//! OpenAPI document for the user routes

use kernel::openapi::BearerSecurity;
use utoipa::OpenApi;

use crate::presentation::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register,
        handlers::login,
        handlers::list_users,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
    ),
    modifiers(&BearerSecurity),
    tags((name = "users", description = "Staff accounts and login"))
)]
pub struct UserApi;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_user_routes() {
        let doc = serde_json::to_value(UserApi::openapi()).unwrap();
        let paths = &doc["paths"];

        assert!(paths["/api/users/register"]["post"].is_object());
        assert!(paths["/api/users/login"]["post"].is_object());
        assert!(paths["/api/users"]["get"].is_object());
        for method in ["get", "put", "delete"] {
            assert!(paths["/api/users/{id}"][method].is_object(), "{method}");
        }

        // Only the protected routes carry the bearer requirement.
        assert!(paths["/api/users/login"]["post"]["security"].is_null());
        assert_eq!(
            paths["/api/users"]["get"]["security"][0]["bearer_auth"],
            serde_json::json!([])
        );
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}
