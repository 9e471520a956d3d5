//! Relay orchestrator
//!
//! One call to [`Relay::handle`] per invocation: normalize, publish each
//! unit in order, stop at the first failure, build the response envelope.
//! The topic address and backend handle are fixed when the relay is built
//! and shared read-only by every invocation.

use crate::backend::NotificationBackend;
use crate::publisher::Publisher;
use courier_core::config::{CourierConfig, PublishConfig};
use courier_core::types::{RelayMode, RelayResponse, TopicAddress};
use courier_core::{normalizer, resolver, Result, BATCH_SUCCESS_BODY};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct Relay {
    address: TopicAddress,
    publisher: Publisher,
}

impl Relay {
    pub fn new(
        backend: Arc<dyn NotificationBackend>,
        address: TopicAddress,
        options: PublishConfig,
    ) -> Self {
        Self {
            address,
            publisher: Publisher::new(backend, options),
        }
    }

    /// Validate the configuration and resolve the topic address up front
    pub fn from_config(
        backend: Arc<dyn NotificationBackend>,
        config: &CourierConfig,
    ) -> Result<Self> {
        config.validate()?;
        let address = resolver::resolve(&config.topic)?;

        info!(
            "Relay ready: topic {} via {} backend",
            address,
            backend.name()
        );
        Ok(Self::new(backend, address, config.publish.clone()))
    }

    pub fn address(&self) -> &TopicAddress {
        &self.address
    }

    /// Relay one inbound event
    pub async fn handle(&self, event: Value) -> Result<RelayResponse> {
        let event = normalizer::classify(event)?;
        let mode = event.mode();
        let total = event.len();

        info!("Relaying {} event with {} unit(s) to {}", mode, total, self.address);

        let mut last = None;
        for (index, unit) in event.into_units().iter().enumerate() {
            match self.publisher.publish(&self.address, unit).await {
                Ok(result) => {
                    debug!("Unit {}/{} published as {}", index + 1, total, result.message_id);
                    last = Some(result);
                }
                Err(e) => {
                    error!(
                        "Aborting relay at unit {}/{} ({} already published): {}",
                        index + 1,
                        total,
                        index,
                        e
                    );
                    return Err(e);
                }
            }
        }

        let body = match (mode, last) {
            (RelayMode::Single, Some(result)) => serde_json::to_string(&result.raw)?,
            _ => BATCH_SUCCESS_BODY.to_string(),
        };

        Ok(RelayResponse::ok(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use courier_core::config::AddressingMode;
    use courier_core::types::MessageAttribute;
    use serde_json::json;

    const QUEUE: &str = "teste";

    /// Topic with one subscribed queue, as the provisioning harness sets up
    fn harness(config: &CourierConfig) -> (Arc<MemoryBackend>, Relay) {
        let backend = Arc::new(MemoryBackend::new());
        let relay = Relay::from_config(backend.clone(), config).unwrap();
        backend.create_topic(relay.address());
        backend.subscribe(relay.address(), "sqs", QUEUE).unwrap();
        (backend, relay)
    }

    fn delivered(backend: &MemoryBackend) -> Vec<Value> {
        backend
            .receive(QUEUE, 10)
            .iter()
            .map(|m| m.notification_body().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_single_event_end_to_end() {
        let (backend, relay) = harness(&CourierConfig::default());
        let input = json!({"bla": "blab"});

        let response = relay.handle(input.clone()).await.unwrap();
        assert_eq!(response.status_code, 200);

        let raw: Value = serde_json::from_str(&response.body).unwrap();
        assert!(raw["MessageId"].as_str().is_some_and(|id| !id.is_empty()));
        assert!(raw["ResponseMetadata"]["RequestId"].is_string());

        assert_eq!(delivered(&backend), vec![input]);
    }

    #[tokio::test]
    async fn test_large_integers_pass_through_unchanged() {
        let (backend, relay) = harness(&CourierConfig::default());
        let text = r#"{"balance":12345678901234567890123}"#;
        let input: Value = serde_json::from_str(text).unwrap();

        relay.handle(input.clone()).await.unwrap();

        let published = backend.published();
        assert_eq!(published[0].1.body, text);
        assert_eq!(delivered(&backend), vec![input]);
    }

    #[tokio::test]
    async fn test_single_record_batch_end_to_end() {
        let (backend, relay) = harness(&CourierConfig::default());
        let input = json!({"records": [{"keys": {"pk": {"S": "A"}, "sk": {"S": "B"}}}]});

        let response = relay.handle(input).await.unwrap();
        assert_eq!(response, RelayResponse::ok(BATCH_SUCCESS_BODY));
        assert_eq!(
            delivered(&backend),
            vec![json!({"pk": {"S": "A"}, "sk": {"S": "B"}})]
        );
    }

    #[tokio::test]
    async fn test_multi_record_batch_keeps_order() {
        let (backend, relay) = harness(&CourierConfig::default());
        let input = json!({
            "records": [
                {"eventName": "INSERT", "keys": {"pk": {"S": "A"}, "sk": {"S": "B"}}},
                {"eventName": "REMOVE", "keys": {"pk": {"S": "C"}, "sk": {"S": "D"}}}
            ]
        });

        relay.handle(input).await.unwrap();
        assert_eq!(
            delivered(&backend),
            vec![
                json!({"pk": {"S": "A"}, "sk": {"S": "B"}}),
                json!({"pk": {"S": "C"}, "sk": {"S": "D"}}),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_batch_publishes_nothing() {
        let (backend, relay) = harness(&CourierConfig::default());

        let response = relay.handle(json!({"records": []})).await.unwrap();
        assert_eq!(response.body, BATCH_SUCCESS_BODY);
        assert!(backend.published().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_invocations_are_not_deduplicated() {
        let (backend, relay) = harness(&CourierConfig::default());
        let input = json!({"bla": "blab"});

        relay.handle(input.clone()).await.unwrap();
        relay.handle(input.clone()).await.unwrap();

        let messages = backend.receive(QUEUE, 10);
        assert_eq!(messages.len(), 2);
        assert_ne!(messages[0].body, messages[1].body);
        for message in &messages {
            assert_eq!(message.notification_body().unwrap(), input);
        }
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_units() {
        let (backend, relay) = harness(&CourierConfig::default());
        backend.reject_attempt(2);

        let input = json!({
            "records": [
                {"keys": {"pk": {"S": "1"}}},
                {"keys": {"pk": {"S": "2"}}},
                {"keys": {"pk": {"S": "3"}}}
            ]
        });
        let err = relay.handle(input).await.unwrap_err();
        assert_eq!(err.code(), "PublishFailure");

        // the third unit is never attempted
        assert_eq!(backend.attempts(), 2);
        assert_eq!(backend.published().len(), 1);

        // the unit published before the failure stays delivered
        assert_eq!(delivered(&backend), vec![json!({"pk": {"S": "1"}})]);
    }

    #[tokio::test]
    async fn test_missing_topic_is_an_invocation_error() {
        let backend = Arc::new(MemoryBackend::new());
        let relay = Relay::from_config(backend, &CourierConfig::default()).unwrap();

        let err = relay.handle(json!({"bla": "blab"})).await.unwrap_err();
        assert_eq!(err.code(), "PublishFailure");
    }

    #[tokio::test]
    async fn test_malformed_batch_publishes_nothing() {
        let (backend, relay) = harness(&CourierConfig::default());

        let input = json!({"records": [{"keys": {"pk": {"S": "1"}}}, {"no_keys": {}}]});
        let err = relay.handle(input).await.unwrap_err();
        assert_eq!(err.code(), "MalformedEvent");
        assert!(backend.published().is_empty());
    }

    #[test]
    fn test_from_config_resolves_once() {
        let mut config = CourierConfig::default();
        config.topic.platform_region = Some("us-east-1".into());

        let relay = Relay::from_config(Arc::new(MemoryBackend::new()), &config).unwrap();
        assert_eq!(
            relay.address().as_str(),
            "arn:aws:sns:us-east-1:000000000000:teste"
        );
    }

    #[test]
    fn test_from_config_rejects_gaps() {
        let mut config = CourierConfig::default();
        config.topic.mode = AddressingMode::Fixed;

        let err = Relay::from_config(Arc::new(MemoryBackend::new()), &config)
            .err()
            .unwrap();
        assert_eq!(err.code(), "ConfigurationGap");

        let mut config = CourierConfig::default();
        config.publish.subject = Some(String::new());
        assert!(Relay::from_config(Arc::new(MemoryBackend::new()), &config).is_err());
    }

    #[tokio::test]
    async fn test_static_subject_and_attributes_are_attached() {
        let mut config = CourierConfig::default();
        config.publish.subject = Some("change".into());
        config
            .publish
            .attributes
            .insert("origin".into(), MessageAttribute::string("orders-table"));
        let (backend, relay) = harness(&config);

        relay
            .handle(json!({"records": [{"keys": {"pk": {"S": "A"}}}]}))
            .await
            .unwrap();

        let messages = backend.receive(QUEUE, 10);
        let envelope: Value = serde_json::from_str(&messages[0].body).unwrap();
        assert_eq!(envelope["Subject"], "change");
        assert_eq!(envelope["MessageAttributes"]["origin"]["Value"], "orders-table");
    }
}
