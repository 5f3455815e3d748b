pub mod apps;
pub mod health;

pub use apps::{list_apps, list_reviews};
pub use health::health;

use crate::state::AppState;
use axum::{routing::get, Router};

/// Builds the application routes; CORS and tracing layers are added by the caller
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/app/list", get(list_apps))
        .route("/app/reviews", get(list_reviews))
        .route("/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::RatingPolicy;
    use crate::models::HealthResponse;
    use crate::test_support::test_client;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            upstream: test_client("http://127.0.0.1:9"),
            apps_cache_file: "apps.json".into(),
            reviews_dump_dir: "reviews".into(),
            rating_policy: RatingPolicy::default(),
            version: Arc::new("1.2.3".to_string()),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, "1.2.3");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = router(state())
            .oneshot(Request::builder().uri("/apps").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
