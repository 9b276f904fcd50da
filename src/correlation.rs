//! Correlation identifiers attached to notification spans.

use rand::rngs::OsRng;
use rand::TryRngCore;
use thiserror::Error;
use uuid::{Builder, Uuid};

#[derive(Error, Debug, Clone)]
#[error("failed to generate correlation id: {0}")]
pub struct CorrelationIdError(pub String);

/// A source of fresh correlation identifiers.
pub trait CorrelationIds: Send + Sync {
    fn next_id(&self) -> Result<Uuid, CorrelationIdError>;
}

/// Random version 4 UUIDs drawn straight from the operating system's
/// entropy source. Unlike `Uuid::new_v4`, a failing source is reported
/// instead of panicking.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomIds;

impl CorrelationIds for OsRandomIds {
    fn next_id(&self) -> Result<Uuid, CorrelationIdError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CorrelationIdError(e.to_string()))?;
        Ok(Builder::from_random_bytes(bytes).into_uuid())
    }
}
