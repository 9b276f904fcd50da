//! Pipeline Notifier - Data Pipeline Status Notifications
//!
//! Publishes one pipeline status notification to an SNS topic, records a
//! `Notify` span for it and prints a localized confirmation line.

use anyhow::Result;
use clap::Parser;
use pipeline_notifier::{
    cli::Cli,
    config::Config,
    formatting::LocalePrinter,
    notifier::Notifier,
    publisher::SnsPublisher,
    telemetry::{init_logging, init_tracer_provider},
};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Manually initialize logging for this specific error
        let _ = init_logging("info");
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    init_logging(&config.log_level)?;

    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Locale: {}", config.locale);
    info!("Topic: {}", config.topic.arn);
    info!("AWS Region: {}", config.aws.region);
    if let Some(profile) = &config.aws.profile {
        info!("AWS Profile: {}", profile);
    }
    if let Some(endpoint) = &config.aws.endpoint_url {
        info!("SNS Endpoint Override: {}", endpoint);
    }
    info!("Trace Endpoint: {}", config.tracing.endpoint);
    info!("-------------------------------------------------------");

    // An invalid notification is rejected before anything touches the network.
    let notification = cli.notification().map_err(|e| {
        error!(error = %e, "Invalid notification");
        e
    })?;

    let telemetry = init_tracer_provider(&config.tracing).map_err(|e| {
        error!(error = %e, "Tracing setup failed");
        e
    })?;

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(async {
        let publisher = SnsPublisher::from_config(&config.aws).await;
        let formatter = LocalePrinter::new(config.locale);
        let notifier = Notifier::new(telemetry.provider(), &publisher, &formatter)
            .with_topic(config.topic.arn.clone());
        notifier.notify(notification).await
    });
    drop(runtime);

    // Flush the span even when the notification failed.
    if let Err(e) = telemetry.shutdown() {
        warn!(error = %e, "Tracer provider shutdown failed");
    }

    let delivery = outcome.map_err(|e| {
        error!(error = %e, "Notification failed");
        e
    })?;
    info!(
        message_id = %delivery.message_id,
        correlation_id = %delivery.correlation_id,
        "Done"
    );

    Ok(())
}
