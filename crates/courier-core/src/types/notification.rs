//! Outbound notification types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute data types carried as string values
const ATTRIBUTE_DATA_TYPES: &[&str] = &["String", "Number", "String.Array"];

/// Static message attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttribute {
    /// Data type, optionally with a custom suffix (e.g. `Number.float`)
    #[serde(rename = "Type")]
    pub data_type: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl MessageAttribute {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            value: value.into(),
        }
    }

    pub fn number(value: impl ToString) -> Self {
        Self {
            data_type: "Number".to_string(),
            value: value.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let base = self.data_type.split('.').next().unwrap_or("");
        let known = ATTRIBUTE_DATA_TYPES
            .iter()
            .any(|t| *t == self.data_type || *t == base);
        if !known {
            return Err(format!("unsupported data type '{}'", self.data_type));
        }
        if self.value.is_empty() {
            return Err("value is empty".to_string());
        }
        if base == "Number" && self.value.parse::<f64>().is_err() {
            return Err(format!("'{}' is not a number", self.value));
        }
        Ok(())
    }
}

/// One message handed to the messaging backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundNotification {
    /// JSON text
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, MessageAttribute>,
}

impl OutboundNotification {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            subject: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_attributes(mut self, attributes: BTreeMap<String, MessageAttribute>) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Backend-assigned message identifier
    pub message_id: String,
    /// Provider response as returned by the backend
    pub raw: Value,
}

/// Envelope returned to the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl RelayResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_validation() {
        assert!(MessageAttribute::string("orders").validate().is_ok());
        assert!(MessageAttribute::number(42).validate().is_ok());
        assert!(MessageAttribute::number("4x").validate().is_err());

        let custom = MessageAttribute {
            data_type: "Number.float".into(),
            value: "1.5".into(),
        };
        assert!(custom.validate().is_ok());

        let binary = MessageAttribute {
            data_type: "Binary".into(),
            value: "AAEC".into(),
        };
        assert!(binary.validate().is_err());

        let unknown = MessageAttribute {
            data_type: "Json".into(),
            value: "{}".into(),
        };
        assert!(unknown.validate().is_err());
        assert!(MessageAttribute::string("").validate().is_err());
    }

    #[test]
    fn test_response_serialization() {
        let response = RelayResponse::ok("done");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"statusCode": 200, "body": "done"}));
    }

    #[test]
    fn test_notification_builder() {
        let mut attributes = BTreeMap::new();
        attributes.insert("source".to_string(), MessageAttribute::string("stream"));

        let notification = OutboundNotification::new("{}")
            .with_subject(Some("change".into()))
            .with_attributes(attributes);
        assert_eq!(notification.subject.as_deref(), Some("change"));
        assert_eq!(notification.attributes.len(), 1);
    }
}
