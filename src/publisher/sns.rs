//! A client for publishing notifications to an AWS SNS topic.

use crate::config::AwsConfig;
use crate::core::{PublishError, PublishReceipt, PublishRequest, Publisher};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sns::config::retry::RetryConfig;
use aws_sdk_sns::error::DisplayErrorContext;
use opentelemetry::context::FutureExt;
use opentelemetry::Context;
use tracing::{debug, error, info};

/// Publishes messages through the SNS `Publish` API.
///
/// SDK-level retries are turned off; a failed call is reported once.
#[derive(Clone, Debug)]
pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
}

impl SnsPublisher {
    /// Resolves AWS credentials and region from the application config.
    pub async fn from_config(config: &AwsConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::from_sdk_config(&sdk_config)
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        let conf = aws_sdk_sns::config::Builder::from(sdk_config)
            .retry_config(RetryConfig::disabled())
            .build();
        Self::from_conf(conf)
    }

    pub fn from_conf(conf: aws_sdk_sns::Config) -> Self {
        let conf = conf
            .to_builder()
            .retry_config(RetryConfig::disabled())
            .build();
        Self {
            client: aws_sdk_sns::Client::from_conf(conf),
        }
    }
}

/// Loads the shared SDK config, honouring an optional profile and endpoint.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

#[async_trait]
impl Publisher for SnsPublisher {
    fn name(&self) -> &str {
        "sns"
    }

    async fn publish(
        &self,
        cx: &Context,
        request: PublishRequest,
    ) -> Result<PublishReceipt, PublishError> {
        debug!(topic = %request.topic, "Sending SNS Publish request");
        let result = self
            .client
            .publish()
            .topic_arn(&request.topic)
            .subject(&request.subject)
            .message(&request.body)
            .send()
            .with_context(cx.clone())
            .await;

        match result {
            Ok(output) => match output.message_id() {
                Some(message_id) => {
                    info!(topic = %request.topic, message_id, "Successfully published to SNS.");
                    Ok(PublishReceipt {
                        message_id: message_id.to_string(),
                    })
                }
                None => {
                    error!(topic = %request.topic, "SNS accepted the message without an id");
                    Err(PublishError::MissingMessageId(request.topic))
                }
            },
            Err(e) => {
                let reason = DisplayErrorContext(&e).to_string();
                error!(topic = %request.topic, error = %reason, "SNS Publish failed");
                Err(PublishError::Service {
                    topic: request.topic,
                    reason,
                })
            }
        }
    }
}
