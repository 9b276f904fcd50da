//! The notifier: publishes a pipeline status message and traces the send.

use crate::config::DEFAULT_TOPIC_ARN;
use crate::core::{Notification, PublishError, PublishRequest, Publisher};
use crate::correlation::{CorrelationIdError, CorrelationIds, OsRandomIds};
use crate::formatting::{MessageFormatter, CONFIRMATION_TEMPLATE};
use opentelemetry::trace::{TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::io::{self, Write};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Name of the tracer notification spans are created from.
pub const TRACER_NAME: &str = "my-tracer";
/// Name of the span covering one notification.
pub const SPAN_NAME: &str = "Notify";
/// Span attribute holding the correlation identifier.
pub const CORRELATION_ID_KEY: &str = "UUID";
/// Subject line of every published message.
pub const SUBJECT: &str = "Data Pipeline Notification";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    CorrelationId(#[from] CorrelationIdError),

    #[error("failed to write confirmation: {0}")]
    Output(#[from] io::Error),
}

/// The result of a successful notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Identifier the backend assigned to the published message.
    pub message_id: String,
    /// Value recorded on the span under [`CORRELATION_ID_KEY`].
    pub correlation_id: Uuid,
    /// The line written to the output.
    pub confirmation: String,
}

/// Sends pipeline notifications.
///
/// The tracer provider, publisher and formatter are borrowed and must
/// outlive the notifier. Shutting the tracer provider down is the caller's
/// job.
pub struct Notifier<'a> {
    tracer_provider: &'a SdkTracerProvider,
    publisher: &'a dyn Publisher,
    formatter: &'a dyn MessageFormatter,
    topic: String,
    ids: Box<dyn CorrelationIds>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl<'a> Notifier<'a> {
    /// Creates a notifier that publishes to the default topic and prints to
    /// standard output. Performs no I/O.
    pub fn new(
        tracer_provider: &'a SdkTracerProvider,
        publisher: &'a dyn Publisher,
        formatter: &'a dyn MessageFormatter,
    ) -> Self {
        Self {
            tracer_provider,
            publisher,
            formatter,
            topic: DEFAULT_TOPIC_ARN.to_string(),
            ids: Box::new(OsRandomIds),
            out: Mutex::new(Box::new(io::stdout())),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_correlation_ids(mut self, ids: impl CorrelationIds + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Redirects the confirmation line, e.g. into a buffer in tests.
    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Mutex::new(Box::new(out));
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publishes `notification` and records a `Notify` span for it.
    ///
    /// The span is ended on every exit path; on success it has ended before
    /// this returns. Only the notification's message is sent as the body.
    /// Nothing is printed unless the publish and the span annotation succeed.
    pub async fn notify(&self, notification: Notification) -> Result<Delivery, NotifyError> {
        let tracer = self.tracer_provider.tracer(TRACER_NAME);
        let span = tracer.start_with_context(SPAN_NAME, &Context::new());
        // Dropping the context ends the span if we bail out early.
        let cx = Context::new().with_span(span);

        let request = PublishRequest {
            topic: self.topic.clone(),
            subject: SUBJECT.to_string(),
            body: notification.message().to_string(),
        };

        debug!(
            pipeline = notification.pipeline_name(),
            status = %notification.status(),
            occurred_at = %notification.occurred_at(),
            backend = self.publisher.name(),
            "Publishing pipeline notification"
        );
        let receipt = self.publisher.publish(&cx, request).await?;

        let correlation_id = self.ids.next_id()?;
        cx.span().set_attribute(KeyValue::new(
            CORRELATION_ID_KEY,
            correlation_id.to_string(),
        ));
        cx.span().end();

        info!(
            pipeline = notification.pipeline_name(),
            message_id = %receipt.message_id,
            correlation_id = %correlation_id,
            "Notification published"
        );

        let confirmation = self
            .formatter
            .format_line(CONFIRMATION_TEMPLATE, &[notification.pipeline_name()]);
        {
            let mut out = self
                .out
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            writeln!(out, "{}", confirmation)?;
            out.flush()?;
        }

        Ok(Delivery {
            message_id: receipt.message_id,
            correlation_id,
            confirmation,
        })
    }
}
