//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. Configuration overrides are merged on top of the
//! `pipeline-notifier.toml` file and environment variables; the remaining
//! arguments describe the notification to send.

use crate::core::{Notification, NotificationError, PipelineStatus};
use clap::Parser;
use figment::{
    providers::Serialized,
    value::{Dict, Map},
    Error, Figment, Metadata, Profile, Provider,
};
use std::io::Read;
use std::path::PathBuf;

/// Publishes a data pipeline status notification and traces the send.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name of the pipeline the event pertains to.
    #[arg(long, default_value = "my-pipeline", conflicts_with = "from_json")]
    pub pipeline_name: String,

    /// Pipeline status (SUCCEEDED, FAILED, RUNNING, CANCELLED).
    #[arg(long, default_value = "FAILED", conflicts_with = "from_json")]
    pub status: String,

    /// Event time in seconds since the Unix epoch.
    #[arg(long, default_value_t = 1643723400, allow_negative_numbers = true, conflicts_with = "from_json")]
    pub timestamp: i64,

    /// Human-readable detail sent as the message body.
    #[arg(long, default_value = "Error processing data", conflicts_with = "from_json")]
    pub message: String,

    /// Read the notification from a JSON file instead (`-` for stdin).
    #[arg(long, value_name = "FILE")]
    pub from_json: Option<PathBuf>,

    /// Topic to publish to.
    #[arg(long, value_name = "ARN")]
    pub topic_arn: Option<String>,

    /// AWS region of the topic.
    #[arg(long)]
    pub region: Option<String>,

    /// OTLP/HTTP traces endpoint of the collector.
    #[arg(long, value_name = "URL")]
    pub otlp_endpoint: Option<String>,

    /// Locale of the confirmation line (e.g. en, de-DE).
    #[arg(long)]
    pub locale: Option<String>,

    /// Log level filter (overridden by RUST_LOG).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Builds the notification described by the arguments.
    pub fn notification(&self) -> Result<Notification, NotificationError> {
        if let Some(path) = &self.from_json {
            let input = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| NotificationError::Json(e.to_string()))?;
                buf
            } else {
                std::fs::read_to_string(path)
                    .map_err(|e| NotificationError::Json(format!("{}: {}", path.display(), e)))?
            };
            return Notification::from_json(&input);
        }

        let status: PipelineStatus = self.status.parse()?;
        Notification::new(
            self.pipeline_name.clone(),
            status,
            self.timestamp,
            self.message.clone(),
        )
    }
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut figment = Figment::new();

        if let Some(arn) = &self.topic_arn {
            figment = figment.merge(Serialized::default("topic.arn", arn));
        }
        if let Some(region) = &self.region {
            figment = figment.merge(Serialized::default("aws.region", region));
        }
        if let Some(endpoint) = &self.otlp_endpoint {
            figment = figment.merge(Serialized::default("tracing.endpoint", endpoint));
        }
        if let Some(locale) = &self.locale {
            figment = figment.merge(Serialized::default("locale", locale));
        }
        if let Some(level) = &self.log_level {
            figment = figment.merge(Serialized::default("log_level", level));
        }

        figment.data()
    }
}
