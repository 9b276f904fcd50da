//! Core domain types and service traits for the pipeline notifier
//!
//! This module defines the notification record that flows into the
//! `Notifier`, the outbound publish request it produces, and the trait
//! contract every publishing backend implements.

use async_trait::async_trait;
use opentelemetry::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The outcome or state of a pipeline run being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PipelineStatus {
    Succeeded,
    Failed,
    Running,
    Cancelled,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::Succeeded => "SUCCEEDED",
            PipelineStatus::Failed => "FAILED",
            PipelineStatus::Running => "RUNNING",
            PipelineStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStatus {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUCCEEDED" => Ok(PipelineStatus::Succeeded),
            "FAILED" => Ok(PipelineStatus::Failed),
            "RUNNING" => Ok(PipelineStatus::Running),
            "CANCELLED" => Ok(PipelineStatus::Cancelled),
            "" => Err(NotificationError::Empty("status")),
            other => Err(NotificationError::UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for PipelineStatus {
    type Error = NotificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PipelineStatus> for String {
    fn from(status: PipelineStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A status event for one pipeline run.
///
/// All fields are validated at construction and cannot be changed afterwards.
/// Deserialization goes through the same validation as [`Notification::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NotificationRecord")]
pub struct Notification {
    pipeline_name: String,
    status: PipelineStatus,
    timestamp: i64,
    message: String,
}

/// Unvalidated wire shape of a [`Notification`].
#[derive(Debug, Deserialize)]
struct NotificationRecord {
    pipeline_name: String,
    status: PipelineStatus,
    timestamp: i64,
    message: String,
}

impl TryFrom<NotificationRecord> for Notification {
    type Error = NotificationError;

    fn try_from(record: NotificationRecord) -> Result<Self, Self::Error> {
        Notification::new(
            record.pipeline_name,
            record.status,
            record.timestamp,
            record.message,
        )
    }
}

impl Notification {
    /// Creates a notification, rejecting blank strings and non-positive timestamps.
    pub fn new(
        pipeline_name: impl Into<String>,
        status: PipelineStatus,
        timestamp: i64,
        message: impl Into<String>,
    ) -> Result<Self, NotificationError> {
        let pipeline_name = pipeline_name.into();
        let message = message.into();

        if pipeline_name.trim().is_empty() {
            return Err(NotificationError::Empty("pipeline_name"));
        }
        if message.trim().is_empty() {
            return Err(NotificationError::Empty("message"));
        }
        if timestamp <= 0 {
            return Err(NotificationError::InvalidTimestamp(timestamp));
        }

        Ok(Self {
            pipeline_name,
            status,
            timestamp,
            message,
        })
    }

    /// Parses a notification from its JSON form.
    pub fn from_json(input: &str) -> Result<Self, NotificationError> {
        serde_json::from_str(input).map_err(|e| NotificationError::Json(e.to_string()))
    }

    pub fn pipeline_name(&self) -> &str {
        &self.pipeline_name
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    /// Event time in seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The event time rendered as RFC 3339, for log lines.
    pub fn occurred_at(&self) -> String {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notification field `{0}` must not be empty")]
    Empty(&'static str),

    #[error("notification timestamp must be a positive epoch second, got {0}")]
    InvalidTimestamp(i64),

    #[error("unknown pipeline status: {0}")]
    UnknownStatus(String),

    #[error("invalid notification JSON: {0}")]
    Json(String),
}

/// An outbound message addressed to a notification topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Resource identifier of the destination topic.
    pub topic: String,
    pub subject: String,
    pub body: String,
}

/// What the backend returned for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: String,
}

#[derive(Error, Debug, Clone)]
pub enum PublishError {
    #[error("publish to {topic} failed: {reason}")]
    Service { topic: String, reason: String },

    #[error("publish to {0} returned no message id")]
    MissingMessageId(String),
}

// =============================================================================
// Service Traits
// =============================================================================

/// Sends messages to a pub/sub notification topic
#[async_trait]
pub trait Publisher: Send + Sync {
    /// A short name for the backend (e.g., "sns"), used in log lines.
    fn name(&self) -> &str;

    /// Publishes a single message.
    ///
    /// # Arguments
    /// * `cx` - The trace context the backend call should run under
    /// * `request` - The message to send
    ///
    /// # Returns
    /// * `Ok(PublishReceipt)` once the backend has accepted the message
    /// * `Err` for transport or service errors; no retry is attempted
    async fn publish(
        &self,
        cx: &Context,
        request: PublishRequest,
    ) -> Result<PublishReceipt, PublishError>;
}
