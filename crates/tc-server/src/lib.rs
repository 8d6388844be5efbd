//! HTTP surface for Theorycrafter portfolio metrics.
//!
//! `POST /metrics` computes risk/return statistics for a weighted portfolio,
//! `POST /prices` returns aligned raw prices for charting and `GET /health`
//! reports liveness.

pub mod config;
pub mod error;
pub mod routes;
pub mod schemas;
pub mod state;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Build the router with CORS restricted to the configured origins.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    routes::routes().layer(cors).with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tc_data::StaticPriceProvider;
    use tower::ServiceExt;

    fn app_with_default_origins() -> Router {
        app(AppState::with_provider(
            ServerConfig::default(),
            Arc::new(StaticPriceProvider::new()),
        ))
    }

    async fn preflight(origin: &str) -> axum::response::Response {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/metrics")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        app_with_default_origins().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_cors_allows_dev_frontend() {
        let response = preflight("http://localhost:5173").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_unknown_origin() {
        let response = preflight("https://elsewhere.example").await;
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[test]
    fn test_origin_lists_build() {
        let _ = cors_layer(&["http://ok.example".to_string(), "bad\norigin".to_string()]);
        let _ = cors_layer(&["*".to_string()]);
    }
}
