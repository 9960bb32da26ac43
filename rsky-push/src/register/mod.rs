//! Device registration endpoint

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    AppState,
    config::AppConfig,
    error::Result,
    sns::{NotificationProvider, PROTOCOL_APPLICATION},
};

pub const REGISTERED_MESSAGE: &str = "Device registered successfully";

/// Body for POST /register
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub message: String,
    pub endpoint_arn: String,
}

/// POST /register
pub async fn register_device(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>> {
    let Json(request) = payload?;

    let endpoint_arn =
        register_token(state.provider.as_ref(), &state.config, &request.token).await?;

    Ok(Json(RegisterResponse {
        message: REGISTERED_MESSAGE.to_string(),
        endpoint_arn,
    }))
}

/// Create a platform endpoint for `token` and subscribe it to the broadcast topic.
///
/// The endpoint is not deleted if the subscription fails.
pub async fn register_token(
    provider: &dyn NotificationProvider,
    config: &AppConfig,
    token: &str,
) -> Result<String> {
    info!("Registering device token ({} chars)", token.len());

    let endpoint_arn = provider
        .create_platform_endpoint(&config.platform_application_arn, token)
        .await?;

    match provider
        .subscribe(&config.sns_topic_arn, PROTOCOL_APPLICATION, &endpoint_arn)
        .await
    {
        Ok(subscription_arn) => {
            info!(
                "Subscribed {} to {}: {}",
                endpoint_arn,
                config.sns_topic_arn,
                subscription_arn.as_deref().unwrap_or("pending")
            );
            Ok(endpoint_arn)
        }
        Err(e) => {
            warn!("Subscribe failed, endpoint left orphaned: {}", endpoint_arn);
            Err(e)
        }
    }
}
