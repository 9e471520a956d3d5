//! Inbound events and relay units

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Processing mode decided once when an event enters the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayMode {
    Single,
    Batch,
}

impl fmt::Display for RelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayMode::Single => f.write_str("single"),
            RelayMode::Batch => f.write_str("batch"),
        }
    }
}

/// One upstream data change. Only `keys` is relayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub keys: Map<String, Value>,
}

/// Classified invocation input
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Opaque event relayed as-is
    Single(Value),
    /// Change records, each relayed as its key subset
    Batch(Vec<ChangeRecord>),
}

impl InboundEvent {
    pub fn mode(&self) -> RelayMode {
        match self {
            InboundEvent::Single(_) => RelayMode::Single,
            InboundEvent::Batch(_) => RelayMode::Batch,
        }
    }

    /// Number of relay units this event yields
    pub fn len(&self) -> usize {
        match self {
            InboundEvent::Single(_) => 1,
            InboundEvent::Batch(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produce the relay units in input order
    pub fn into_units(self) -> Vec<RelayUnit> {
        match self {
            InboundEvent::Single(value) => vec![RelayUnit::new(value)],
            InboundEvent::Batch(records) => records
                .into_iter()
                .map(|record| RelayUnit::new(Value::Object(record.keys)))
                .collect(),
        }
    }
}

/// JSON value that becomes exactly one notification body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelayUnit(Value);

impl RelayUnit {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Encode as the notification body
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl From<Value> for RelayUnit {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
