use crate::core::{PublishError, PublishReceipt, PublishRequest, Publisher};
use async_trait::async_trait;
use opentelemetry::trace::TraceContextExt;
use opentelemetry::Context;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A request seen by [`FakePublisher`], with the trace id that was active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPublish {
    pub request: PublishRequest,
    pub trace_id: String,
}

/// Fake publisher for testing
#[derive(Clone, Default)]
pub struct FakePublisher {
    // Scripted results; the front is used next. Empty means succeed.
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<RecordedPublish>>>,
    fail_with: Option<String>,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every call fails with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Queue a successful response with the given message id
    pub fn add_success_response(&self, message_id: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(message_id.to_string()));
    }

    /// Queue an error response
    pub fn add_error_response(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedPublish> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<PublishRequest> {
        self.calls().into_iter().map(|c| c.request).collect()
    }
}

#[async_trait]
impl Publisher for FakePublisher {
    fn name(&self) -> &str {
        "fake"
    }

    async fn publish(
        &self,
        cx: &Context,
        request: PublishRequest,
    ) -> Result<PublishReceipt, PublishError> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedPublish {
                request: request.clone(),
                trace_id: cx.span().span_context().trace_id().to_string(),
            });
            calls.len()
        };

        let next = match &self.fail_with {
            Some(reason) => Some(Err(reason.clone())),
            None => self.responses.lock().unwrap().pop_front(),
        };

        match next {
            Some(Err(reason)) => Err(PublishError::Service {
                topic: request.topic,
                reason,
            }),
            Some(Ok(message_id)) => Ok(PublishReceipt { message_id }),
            None => Ok(PublishReceipt {
                message_id: format!("fake-message-{}", call_number),
            }),
        }
    }
}
