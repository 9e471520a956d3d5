//! Messaging backends
//!
//! - [`SnsBackend`]: Amazon SNS (or any SNS-compatible endpoint)
//! - [`MemoryBackend`]: in-process topics and subscriber queues

mod memory;
mod sns;

pub use memory::{MemoryBackend, QueueMessage};
pub use sns::SnsBackend;

use async_trait::async_trait;
use courier_core::types::{OutboundNotification, PublishResult, TopicAddress};
use courier_core::Result;

/// Publish side of a messaging backend
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Publish one notification to a topic.
    ///
    /// Any rejection or transport failure is returned as
    /// [`courier_core::Error::Publish`].
    async fn publish(
        &self,
        topic: &TopicAddress,
        notification: &OutboundNotification,
    ) -> Result<PublishResult>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
