//! Notification provider backed by AWS SNS

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_sns as sns;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::{ProvideErrorMetadata, SdkError};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{Error, Result};

/// Delivery protocol for mobile platform endpoints
pub const PROTOCOL_APPLICATION: &str = "application";

/// Push-notification provider operations needed to register a device
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Create a platform endpoint for a device token, returning the endpoint ARN
    async fn create_platform_endpoint(&self, application_arn: &str, token: &str)
    -> Result<String>;

    /// Subscribe an endpoint to a topic, returning the subscription ARN if the provider sent one
    async fn subscribe(
        &self,
        topic_arn: &str,
        protocol: &str,
        endpoint: &str,
    ) -> Result<Option<String>>;
}

/// Build the shared AWS config from the service configuration.
/// Credentials come from the SDK's default provider chain.
pub async fn load_sdk_config(config: &AppConfig) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.aws_region.clone()));
    if let Some(endpoint) = &config.aws_endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

#[derive(Debug, Clone)]
pub struct SnsProvider {
    client: sns::Client,
}

impl SnsProvider {
    pub fn new(cfg: &SdkConfig) -> Self {
        SnsProvider {
            client: sns::Client::new(cfg),
        }
    }

    /// Build from an explicit SNS client config, for endpoints, credentials or retry
    /// settings that differ from the shared `SdkConfig`.
    pub fn from_conf(conf: sns::Config) -> Self {
        SnsProvider {
            client: sns::Client::from_conf(conf),
        }
    }
}

/// Service errors render as `"{code}: {message}"` from the SNS error response.
/// Transport and construction failures render as their `Display` chain.
fn provider_error<E, R>(err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let detail = match &err {
        SdkError::ServiceError(context) => {
            let service_err = context.err();
            match (service_err.code(), service_err.message()) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (Some(code), None) => code.to_string(),
                (None, Some(message)) => message.to_string(),
                (None, None) => error_chain(&err),
            }
        }
        _ => error_chain(&err),
    };
    Error::Registration(detail)
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

#[async_trait]
impl NotificationProvider for SnsProvider {
    async fn create_platform_endpoint(
        &self,
        application_arn: &str,
        token: &str,
    ) -> Result<String> {
        debug!("Creating SNS platform endpoint under {}", application_arn);

        let output = self
            .client
            .create_platform_endpoint()
            .platform_application_arn(application_arn)
            .token(token)
            .send()
            .await
            .map_err(provider_error)?;

        let endpoint_arn = output.endpoint_arn().ok_or_else(|| {
            Error::Registration("CreatePlatformEndpoint returned no EndpointArn".to_string())
        })?;

        info!("Created SNS platform endpoint: {}", endpoint_arn);
        Ok(endpoint_arn.to_string())
    }

    async fn subscribe(
        &self,
        topic_arn: &str,
        protocol: &str,
        endpoint: &str,
    ) -> Result<Option<String>> {
        debug!("Subscribing {} to {} over {}", endpoint, topic_arn, protocol);

        let output = self
            .client
            .subscribe()
            .topic_arn(topic_arn)
            .protocol(protocol)
            .endpoint(endpoint)
            .send()
            .await
            .map_err(provider_error)?;

        Ok(output.subscription_arn().map(str::to_string))
    }
}
