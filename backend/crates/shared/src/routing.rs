//! Router helpers shared by the feature crates

use axum::Router;
use axum::routing::MethodRouter;

use crate::error::app_error::AppError;

/// Extension methods for [`Router`]
pub trait RouterExt<S> {
    /// Route a collection both with and without its trailing slash.
    ///
    /// `/patients` and `/patients/` reach the same handlers. `path` must not
    /// be the root.
    fn route_collection(self, path: &str, method_router: MethodRouter<S>) -> Self;
}

impl<S> RouterExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn route_collection(self, path: &str, method_router: MethodRouter<S>) -> Self {
        let bare = path.trim_end_matches('/');
        self.route(bare, method_router.clone())
            .route(&format!("{bare}/"), method_router)
    }
}

/// Fallback for unmatched paths: `404` with the usual error body
pub async fn not_found() -> AppError {
    AppError::not_found("Route not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, post};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route_collection(
                "/items",
                get(|| async { "list" }).merge(post(|| async { "created" })),
            )
            .fallback(not_found)
    }

    async fn call(method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_collection_answers_with_and_without_slash() {
        assert_eq!(call("GET", "/items").await, (StatusCode::OK, b"list".to_vec()));
        assert_eq!(call("GET", "/items/").await, (StatusCode::OK, b"list".to_vec()));
        assert_eq!(
            call("POST", "/items/").await,
            (StatusCode::OK, b"created".to_vec())
        );
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let (status, bytes) = call("GET", "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Route not found");
        assert_eq!(body["status"], 404);
        assert_eq!(body["title"], "Not Found");
    }
}
