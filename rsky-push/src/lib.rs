//! Blacksky Push Service
//!
//! Registers mobile device tokens as AWS SNS platform endpoints and subscribes
//! them to the broadcast topic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod register;
pub mod sns;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use sns::{NotificationProvider, SnsProvider};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn NotificationProvider>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register::register_device))
        // Health check
        .route("/health", get(health_check))
        .route("/_health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    struct UnusedProvider;

    #[async_trait]
    impl NotificationProvider for UnusedProvider {
        async fn create_platform_endpoint(&self, _: &str, _: &str) -> Result<String> {
            unreachable!()
        }

        async fn subscribe(&self, _: &str, _: &str, _: &str) -> Result<Option<String>> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let state = Arc::new(AppState {
            config: AppConfig::from_lookup(|name| match name {
                "AWS_REGION" => Some("us-east-1".to_string()),
                "PLATFORM_APPLICATION_ARN" | "SNS_TOPIC_ARN" => Some("arn".to_string()),
                _ => None,
            })
            .unwrap(),
            provider: Arc::new(UnusedProvider),
        });

        for path in ["/health", "/_health"] {
            let response = app(state.clone())
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"OK");
        }
    }
}
