//! Notification publisher trait definition.

use async_trait::async_trait;

use crate::errors::PublishError;
use review_ingest_shared::NotificationPayload;

/// At-least-once message emitter to the downstream queue.
///
/// The producer is a scoped resource: acquired once per run and released
/// through [`close`](NotificationPublisher::close) exactly once at run end,
/// regardless of per-place outcomes.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publish one completion notification.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The queue acknowledged delivery
    /// * `Err(PublishError)` - The send failed; the notification is lost
    async fn publish(&self, payload: &NotificationPayload) -> Result<(), PublishError>;

    /// Release the underlying producer, flushing outstanding deliveries.
    async fn close(&self) -> Result<(), PublishError>;
}
