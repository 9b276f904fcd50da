//! Integration tests for the SNS publisher against a mock endpoint.

use aws_sdk_sns::config::{BehaviorVersion, Credentials, Region};
use opentelemetry::Context;
use pipeline_notifier::{
    formatting::{Locale, LocalePrinter},
    publisher::SnsPublisher,
    Notification, Notifier, NotifyError, PipelineStatus, PublishError, PublishRequest, Publisher,
};
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::{capture_output::CapturedOutput, span_capture::SpanCapture};

const TOPIC: &str = "arn:aws:sns:us-west-2:123456789012:my-topic";

const PUBLISH_RESPONSE: &str = r#"<PublishResponse xmlns="https://sns.amazonaws.com/doc/2010-03-31/">
  <PublishResult>
    <MessageId>567910cd-659e-55d4-8ccb-5aaf14679dc0</MessageId>
  </PublishResult>
  <ResponseMetadata>
    <RequestId>d74b8436-ae13-5ab4-a9ff-ce54dfea72a0</RequestId>
  </ResponseMetadata>
</PublishResponse>"#;

const NOT_FOUND_RESPONSE: &str = r#"<ErrorResponse xmlns="https://sns.amazonaws.com/doc/2010-03-31/">
  <Error>
    <Type>Sender</Type>
    <Code>NotFound</Code>
    <Message>Topic does not exist</Message>
  </Error>
  <RequestId>9dd01905-5012-5f99-8663-4b3ecd0dfaef</RequestId>
</ErrorResponse>"#;

fn publisher_for(server: &MockServer) -> SnsPublisher {
    let conf = aws_sdk_sns::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-west-2"))
        .credentials_provider(Credentials::new("test", "test", None, None, "static"))
        .endpoint_url(server.uri())
        .build();
    SnsPublisher::from_conf(conf)
}

fn request() -> PublishRequest {
    PublishRequest {
        topic: TOPIC.to_string(),
        subject: "Data Pipeline Notification".to_string(),
        body: "Error processing data".to_string(),
    }
}

#[tokio::test]
async fn test_publish_sends_topic_subject_and_message() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("Action=Publish"))
        .and(body_string_contains("TopicArn=arn"))
        .and(body_string_contains("my-topic"))
        .and(body_string_contains("Subject=Data"))
        .and(body_string_contains("Message=Error"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(PUBLISH_RESPONSE, "text/xml"),
        )
        .expect(1)
        .mount(&server)
        .await;
    let publisher = publisher_for(&server);

    // Act
    let receipt = publisher.publish(&Context::new(), request()).await.unwrap();

    // Assert
    assert_eq!(receipt.message_id, "567910cd-659e-55d4-8ccb-5aaf14679dc0");
}

#[tokio::test]
async fn test_service_error_is_reported_once() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw(
                NOT_FOUND_RESPONSE.replace("NotFound", "InternalError"),
                "text/xml",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;
    let publisher = publisher_for(&server);

    // Act
    let result = publisher.publish(&Context::new(), request()).await;

    // Assert: a 500 would be retried by the SDK's default policy
    match result {
        Err(PublishError::Service { topic, .. }) => assert_eq!(topic, TOPIC),
        other => panic!("expected a service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_notifier_over_sns_reports_missing_topic() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(NOT_FOUND_RESPONSE, "text/xml"))
        .mount(&server)
        .await;
    let publisher = publisher_for(&server);
    let spans = SpanCapture::new();
    let formatter = LocalePrinter::new(Locale::English);
    let out = CapturedOutput::new();
    let notifier =
        Notifier::new(&spans.provider, &publisher, &formatter).with_output(out.clone());
    let notification = Notification::new(
        "my-pipeline",
        PipelineStatus::Failed,
        1643723400,
        "Error processing data",
    )
    .unwrap();

    // Act
    let err = notifier.notify(notification).await.unwrap_err();

    // Assert
    match err {
        NotifyError::Publish(PublishError::Service { reason, .. }) => {
            assert!(reason.contains("Topic does not exist"), "reason was: {}", reason)
        }
        other => panic!("expected a publish error, got {:?}", other),
    }
    assert!(out.contents().is_empty());
    assert_eq!(spans.finished_spans().len(), 1);
}
