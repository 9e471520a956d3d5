//! Notification publisher

use crate::backend::NotificationBackend;
use courier_core::config::PublishConfig;
use courier_core::types::{OutboundNotification, PublishResult, RelayUnit, TopicAddress};
use courier_core::Result;
use std::sync::Arc;
use tracing::debug;

/// Turns relay units into notifications and hands them to the backend
#[derive(Clone)]
pub struct Publisher {
    backend: Arc<dyn NotificationBackend>,
    options: PublishConfig,
}

impl Publisher {
    pub fn new(backend: Arc<dyn NotificationBackend>, options: PublishConfig) -> Self {
        Self { backend, options }
    }

    /// Encode a unit and attach the static subject and attributes
    pub fn build_notification(&self, unit: &RelayUnit) -> Result<OutboundNotification> {
        Ok(OutboundNotification::new(unit.to_body()?)
            .with_subject(self.options.subject.clone())
            .with_attributes(self.options.attributes.clone()))
    }

    /// Publish one unit. Backend failures are returned unchanged.
    pub async fn publish(&self, topic: &TopicAddress, unit: &RelayUnit) -> Result<PublishResult> {
        let notification = self.build_notification(unit)?;
        let result = self.backend.publish(topic, &notification).await?;

        debug!(
            "Published message {} to {} via {} ({} bytes)",
            result.message_id,
            topic,
            self.backend.name(),
            notification.body.len()
        );
        Ok(result)
    }
}
