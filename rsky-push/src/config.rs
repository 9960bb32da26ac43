//! Configuration for the push service

use crate::error::{Error, Result};
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// AWS region hosting the SNS application and topic
    pub aws_region: String,
    /// Optional SNS endpoint override (e.g. localstack)
    pub aws_endpoint: Option<String>,

    /// SNS platform application ARN that device endpoints are created under
    pub platform_application_arn: String,
    /// SNS topic ARN every registered endpoint is subscribed to
    pub sns_topic_arn: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// AWS credentials are not read here; the SDK's default provider chain picks them up.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| Error::Config(format!("{} must be set", name)))
        };

        let port = match var("PUSH_PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| Error::Config(format!("PUSH_PORT is not a valid port: {}", p)))?,
            None => 8000,
        };

        Ok(Self {
            host: var("PUSH_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,

            aws_region: required("AWS_REGION")?,
            aws_endpoint: var("AWS_ENDPOINT"),

            platform_application_arn: required("PLATFORM_APPLICATION_ARN")?,
            sns_topic_arn: required("SNS_TOPIC_ARN")?,
        })
    }
}
