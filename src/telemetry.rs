//! Logging and trace export setup.
//!
//! Log lines go through `tracing` to stderr. Spans created by the `Notifier`
//! go through an OpenTelemetry tracer provider that is built here, handed to
//! the caller, and shut down explicitly when the process is done with it.
//! Nothing is installed as a global provider.

use crate::config::TracingConfig;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    error::OTelSdkError,
    resource::Resource,
    trace::{Sampler, SdkTracerProvider},
};
use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to build span exporter for {endpoint}: {reason}")]
    Exporter { endpoint: String, reason: String },

    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}

/// Installs the process-wide log subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Output goes to stderr so
/// stdout carries only the confirmation line.
pub fn init_logging(default_level: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))
}

/// Builds an always-sampling tracer provider exporting over OTLP/HTTP.
pub fn init_tracer_provider(config: &TracingConfig) -> Result<TelemetryGuard, TelemetryError> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(config.endpoint.as_str())
        .build()
        .map_err(|e| TelemetryError::Exporter {
            endpoint: config.endpoint.clone(),
            reason: e.to_string(),
        })?;

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", config.service_name.clone()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::AlwaysOn)
        .with_batch_exporter(exporter)
        .build();

    debug!(endpoint = %config.endpoint, "Tracer provider initialized");
    Ok(TelemetryGuard::new(provider))
}

/// Owns a tracer provider for the lifetime of the process.
///
/// Call [`TelemetryGuard::shutdown`] to flush pending spans and see the
/// result; dropping the guard without doing so shuts down on a best-effort
/// basis.
pub struct TelemetryGuard {
    provider: SdkTracerProvider,
    shut_down: bool,
}

impl TelemetryGuard {
    pub fn new(provider: SdkTracerProvider) -> Self {
        Self {
            provider,
            shut_down: false,
        }
    }

    pub fn provider(&self) -> &SdkTracerProvider {
        &self.provider
    }

    /// Flushes and shuts down the provider.
    pub fn shutdown(mut self) -> Result<(), OTelSdkError> {
        self.shut_down = true;
        self.provider.shutdown()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if !self.shut_down {
            if let Err(e) = self.provider.shutdown() {
                warn!(error = %e, "Tracer provider shutdown failed");
            }
        }
    }
}
