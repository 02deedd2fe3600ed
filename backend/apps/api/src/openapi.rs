//! Combined OpenAPI document served by Swagger UI

use auth::UserApi;
use clinic::ClinicApi;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Mental Clinic API",
    description = "Patients, appointments, medical records, assessments and risk predictions. \
                   Everything except register and login needs `Authorization: Bearer <token>`."
))]
struct ApiDoc;

/// User and clinic documents merged under one `info` block.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(UserApi::openapi());
    doc.merge(ClinicApi::openapi());
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_document_covers_both_crates() {
        let doc = serde_json::to_value(api_doc()).unwrap();

        assert_eq!(doc["info"]["title"], "Mental Clinic API");
        assert!(doc["paths"]["/api/users/login"]["post"].is_object());
        assert!(doc["paths"]["/api/predictions/{id}"]["post"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
        assert!(doc["components"]["schemas"]["ErrorBody"].is_object());
    }
}
