//! Publishing backends.
//!
//! Every backend implements [`Publisher`](crate::core::Publisher); the
//! `Notifier` only ever sees the trait.

pub mod sns;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::core::{PublishError, PublishReceipt, PublishRequest, Publisher};
pub use sns::SnsPublisher;
