//! Configuration management for the pipeline notifier
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all application settings. It uses the `figment`
//! crate to layer defaults, a `pipeline-notifier.toml` file, environment
//! variables and command-line overrides.

use crate::cli::Cli;
use crate::formatting::Locale;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// The config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pipeline-notifier.toml";

/// The pre-provisioned topic notifications are sent to.
pub const DEFAULT_TOPIC_ARN: &str = "arn:aws:sns:us-west-2:123456789012:my-topic";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// The locale used for the confirmation line.
    pub locale: Locale,
    /// The destination topic.
    pub topic: TopicConfig,
    /// AWS client settings.
    pub aws: AwsConfig,
    /// Trace export settings.
    pub tracing: TracingConfig,
}

/// Configuration for the notification topic.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TopicConfig {
    /// Resource identifier of the topic.
    pub arn: String,
}

/// Configuration for the AWS SDK client.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AwsConfig {
    /// The region the topic lives in.
    pub region: String,
    /// A named profile from the shared AWS config files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Endpoint override, e.g. for a local SNS emulator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

/// Configuration for the span exporter.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TracingConfig {
    /// OTLP/HTTP traces endpoint of the collector.
    pub endpoint: String,
    /// The `service.name` resource attribute.
    pub service_name: String,
}

impl Config {
    /// Loads the application configuration, layering sources in order of
    /// precedence: defaults, TOML file, environment, then CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Toml::file_exact(path),
            None => Toml::file(DEFAULT_CONFIG_FILE),
        };
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(file)
            // e.g. PIPELINE_NOTIFIER_TOPIC__ARN=arn:aws:sns:...
            .merge(Env::prefixed("PIPELINE_NOTIFIER_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            locale: Locale::English,
            topic: TopicConfig {
                arn: DEFAULT_TOPIC_ARN.to_string(),
            },
            aws: AwsConfig {
                region: "us-west-2".to_string(),
                profile: None,
                endpoint_url: None,
            },
            tracing: TracingConfig {
                endpoint: "http://localhost:4318/v1/traces".to_string(),
                service_name: "pipeline-notifier".to_string(),
            },
        }
    }
}
