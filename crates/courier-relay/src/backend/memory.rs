//! In-memory messaging backend
//!
//! Topics fan out to subscribed queues. Queue messages carry the same
//! envelope SNS uses for SQS subscriptions, so consumers decode bodies the
//! way they would against the real service.

use super::NotificationBackend;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use courier_core::types::{OutboundNotification, PublishResult, TopicAddress};
use courier_core::{Error, Result};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::debug;
use uuid::Uuid;

/// Message waiting in a subscriber queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueueMessage {
    pub message_id: String,
    /// SNS notification envelope as JSON text
    pub body: String,
}

impl QueueMessage {
    /// Decode the relayed notification body out of the envelope
    pub fn notification_body(&self) -> Result<Value> {
        let envelope: Value = serde_json::from_str(&self.body)?;
        let message = envelope
            .get("Message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(serde_json::from_str(message)?)
    }
}

#[derive(Debug, Clone)]
struct Subscription {
    arn: String,
    endpoint: String,
}

#[derive(Default)]
struct State {
    topics: BTreeMap<TopicAddress, Vec<Subscription>>,
    queues: HashMap<String, VecDeque<QueueMessage>>,
    published: Vec<(TopicAddress, OutboundNotification)>,
    attempts: usize,
    rejected_attempt: Option<usize>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a topic. Creating an existing topic is a no-op.
    pub fn create_topic(&self, topic: &TopicAddress) {
        self.state.lock().topics.entry(topic.clone()).or_default();
    }

    /// Subscribe a queue endpoint to a topic, returning the subscription ARN.
    ///
    /// Only the `sqs` protocol is modelled.
    pub fn subscribe(&self, topic: &TopicAddress, protocol: &str, endpoint: &str) -> Result<String> {
        if !protocol.eq_ignore_ascii_case("sqs") {
            return Err(Error::Subscription(format!(
                "unsupported protocol '{}'",
                protocol
            )));
        }

        let mut state = self.state.lock();
        let subscriptions = state
            .topics
            .get_mut(topic)
            .ok_or_else(|| Error::Subscription(format!("NotFound: topic {} does not exist", topic)))?;

        let arn = format!("{}:{}", topic, Uuid::new_v4());
        subscriptions.push(Subscription {
            arn: arn.clone(),
            endpoint: endpoint.to_string(),
        });
        state.queues.entry(endpoint.to_string()).or_default();

        debug!("Subscribed {} to {}", endpoint, topic);
        Ok(arn)
    }

    /// Remove a subscription. Returns false when it does not exist.
    pub fn unsubscribe(&self, subscription_arn: &str) -> bool {
        let mut state = self.state.lock();
        for subscriptions in state.topics.values_mut() {
            if let Some(index) = subscriptions.iter().position(|s| s.arn == subscription_arn) {
                subscriptions.remove(index);
                return true;
            }
        }
        false
    }

    /// Take up to `max` messages from a queue, oldest first
    pub fn receive(&self, endpoint: &str, max: usize) -> Vec<QueueMessage> {
        let mut state = self.state.lock();
        match state.queues.get_mut(endpoint) {
            Some(queue) => {
                let count = max.min(queue.len());
                queue.drain(..count).collect()
            }
            None => Vec::new(),
        }
    }

    /// Every notification accepted so far, in publish order
    pub fn published(&self) -> Vec<(TopicAddress, OutboundNotification)> {
        self.state.lock().published.clone()
    }

    /// Reject only the `nth` publish call (1-based). Later calls go through.
    pub fn reject_attempt(&self, nth: usize) {
        self.state.lock().rejected_attempt = Some(nth);
    }

    /// Number of publish calls received, rejected ones included
    pub fn attempts(&self) -> usize {
        self.state.lock().attempts
    }

    pub fn subscription_count(&self, topic: &TopicAddress) -> usize {
        self.state
            .lock()
            .topics
            .get(topic)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn envelope(message_id: &str, topic: &TopicAddress, notification: &OutboundNotification) -> Value {
    let mut envelope = json!({
        "Type": "Notification",
        "MessageId": message_id,
        "TopicArn": topic.as_str(),
        "Message": notification.body,
        "Timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "SignatureVersion": "1",
    });

    if let Some(subject) = &notification.subject {
        envelope["Subject"] = json!(subject);
    }
    if !notification.attributes.is_empty() {
        let attributes: Map<String, Value> = notification
            .attributes
            .iter()
            .map(|(name, attribute)| {
                (
                    name.clone(),
                    json!({"Type": attribute.data_type, "Value": attribute.value}),
                )
            })
            .collect();
        envelope["MessageAttributes"] = Value::Object(attributes);
    }

    envelope
}

#[async_trait]
impl NotificationBackend for MemoryBackend {
    async fn publish(
        &self,
        topic: &TopicAddress,
        notification: &OutboundNotification,
    ) -> Result<PublishResult> {
        let mut state = self.state.lock();

        state.attempts += 1;
        let attempt = state.attempts;
        if state.rejected_attempt == Some(attempt) {
            return Err(Error::publish(topic.as_str(), "publish rejected"));
        }

        let endpoints: Vec<String> = state
            .topics
            .get(topic)
            .ok_or_else(|| Error::publish(topic.as_str(), "NotFound: Topic does not exist"))?
            .iter()
            .map(|s| s.endpoint.clone())
            .collect();

        let message_id = Uuid::new_v4().to_string();
        let body = envelope(&message_id, topic, notification).to_string();

        for endpoint in endpoints {
            state
                .queues
                .entry(endpoint)
                .or_default()
                .push_back(QueueMessage {
                    message_id: Uuid::new_v4().to_string(),
                    body: body.clone(),
                });
        }
        state.published.push((topic.clone(), notification.clone()));

        Ok(PublishResult {
            raw: json!({
                "MessageId": message_id,
                "ResponseMetadata": {"RequestId": Uuid::new_v4().to_string()},
            }),
            message_id,
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
