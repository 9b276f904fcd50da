use clap::Parser;
use pipeline_notifier::cli::Cli;
use pipeline_notifier::config::{Config, DEFAULT_TOPIC_ARN};
use pipeline_notifier::formatting::Locale;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("PIPELINE_NOTIFIER_") {
            std::env::remove_var(key);
        }
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
#[serial]
fn test_load_full_valid_config() {
    clear_env();
    let toml_content = r#"
        log_level = "debug"
        locale = "de-DE"
        [topic]
        arn = "arn:aws:sns:eu-central-1:111111111111:pipelines"
        [aws]
        region = "eu-central-1"
        profile = "ops"
        endpoint_url = "http://localhost:4566"
        [tracing]
        endpoint = "http://collector:4318/v1/traces"
        service_name = "etl-notifier"
    "#;
    let file = config_file(toml_content);

    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.locale, Locale::German);
    assert_eq!(
        config.topic.arn,
        "arn:aws:sns:eu-central-1:111111111111:pipelines"
    );
    assert_eq!(config.aws.region, "eu-central-1");
    assert_eq!(config.aws.profile, Some("ops".to_string()));
    assert_eq!(
        config.aws.endpoint_url,
        Some("http://localhost:4566".to_string())
    );
    assert_eq!(config.tracing.endpoint, "http://collector:4318/v1/traces");
    assert_eq!(config.tracing.service_name, "etl-notifier");
}

#[test]
#[serial]
fn test_partial_file_keeps_defaults() {
    clear_env();
    let file = config_file("[aws]\nregion = \"ap-south-1\"\n");
    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.aws.region, "ap-south-1");
    assert_eq!(config.aws.profile, None);
    assert_eq!(config.topic.arn, DEFAULT_TOPIC_ARN);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.locale, Locale::English);
    assert_eq!(config.tracing.endpoint, "http://localhost:4318/v1/traces");
}

#[test]
#[serial]
fn test_missing_explicit_config_file_is_an_error() {
    clear_env();
    let cli = Cli {
        config: Some("/definitely/not/here/pipeline-notifier.toml".into()),
        ..Default::default()
    };

    assert!(Config::load(&cli).is_err());
}

#[test]
#[serial]
fn test_invalid_locale_is_an_error() {
    clear_env();
    let file = config_file("locale = \"klingon\"\n");
    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    assert!(Config::load(&cli).is_err());
}

#[test]
#[serial]
fn test_env_overrides_file_and_cli_overrides_env() {
    clear_env();
    let file = config_file(
        r#"
        [topic]
        arn = "arn:from:file"
        [aws]
        region = "us-east-1"
    "#,
    );
    std::env::set_var("PIPELINE_NOTIFIER_TOPIC__ARN", "arn:from:env");
    std::env::set_var("PIPELINE_NOTIFIER_AWS__REGION", "eu-west-1");
    std::env::set_var("PIPELINE_NOTIFIER_LOG_LEVEL", "warn");

    let path = file.path().to_str().unwrap();
    let cli = Cli::parse_from([
        "pipeline-notifier",
        "--config",
        path,
        "--region",
        "sa-east-1",
        "--otlp-endpoint",
        "http://otel:4318/v1/traces",
    ]);

    let config = Config::load(&cli).unwrap();
    clear_env();

    assert_eq!(config.topic.arn, "arn:from:env");
    assert_eq!(config.aws.region, "sa-east-1");
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.tracing.endpoint, "http://otel:4318/v1/traces");
}
