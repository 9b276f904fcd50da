//! Pipeline Notifier - publishes data pipeline status notifications
//!
//! This library provides the notification record, the `Notifier` that
//! publishes it to a pub/sub topic while tracing the send, and the
//! configuration and telemetry plumbing the binary wires together.

pub mod cli;
pub mod config;
pub mod core;
pub mod correlation;
pub mod formatting;
pub mod notifier;
pub mod publisher;
pub mod telemetry;

// Re-export core types for convenience
pub use crate::core::*;
pub use notifier::{Delivery, Notifier, NotifyError};
