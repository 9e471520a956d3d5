//! Amazon SNS backend

use super::NotificationBackend;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::operation::RequestId;
use aws_sdk_sns::types::MessageAttributeValue;
use aws_sdk_sns::Client;
use courier_core::config::BackendConfig;
use courier_core::types::{MessageAttribute, OutboundNotification, PublishResult, TopicAddress};
use courier_core::{Error, Result};
use serde_json::json;
use tracing::debug;

/// Publishes through an SNS client built once per execution environment
#[derive(Clone, Debug)]
pub struct SnsBackend {
    client: Client,
}

impl SnsBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the client from the default AWS credential and region chain,
    /// applying the configured overrides.
    pub async fn from_config(config: &BackendConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            debug!("Using custom SNS endpoint {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl NotificationBackend for SnsBackend {
    async fn publish(
        &self,
        topic: &TopicAddress,
        notification: &OutboundNotification,
    ) -> Result<PublishResult> {
        let mut request = self
            .client
            .publish()
            .topic_arn(topic.as_str())
            .message(&notification.body)
            .set_subject(notification.subject.clone());

        for (name, attribute) in &notification.attributes {
            let value = attribute_value(attribute)
                .map_err(|e| Error::publish(topic.as_str(), format!("attribute {}: {}", name, e)))?;
            request = request.message_attributes(name, value);
        }

        let output = request
            .send()
            .await
            .map_err(|e| Error::publish(topic.as_str(), DisplayErrorContext(&e).to_string()))?;

        let message_id = output.message_id().unwrap_or_default().to_string();
        let mut raw = json!({
            "MessageId": message_id,
            "ResponseMetadata": {
                "RequestId": output.request_id(),
            },
        });
        if let Some(sequence) = output.sequence_number() {
            raw["SequenceNumber"] = json!(sequence);
        }

        Ok(PublishResult { message_id, raw })
    }

    fn name(&self) -> &'static str {
        "sns"
    }
}

fn attribute_value(
    attribute: &MessageAttribute,
) -> std::result::Result<MessageAttributeValue, aws_sdk_sns::error::BuildError> {
    MessageAttributeValue::builder()
        .data_type(&attribute.data_type)
        .string_value(&attribute.value)
        .build()
}
