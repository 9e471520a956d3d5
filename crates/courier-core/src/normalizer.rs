//! Event normalization
//!
//! Classifies an inbound payload once, at the boundary. A top-level
//! `records` key selects batch mode; anything else is relayed untouched.
//! Nested batches are not looked into.

use crate::types::{ChangeRecord, InboundEvent, RelayUnit};
use crate::{Error, Result, KEYS_KEY, RECORDS_KEY};
use serde_json::Value;

/// Classify an inbound payload
pub fn classify(mut event: Value) -> Result<InboundEvent> {
    let is_batch = event
        .as_object()
        .is_some_and(|object| object.contains_key(RECORDS_KEY));
    if !is_batch {
        return Ok(InboundEvent::Single(event));
    }

    let records = match event.as_object_mut().and_then(|o| o.remove(RECORDS_KEY)) {
        Some(Value::Array(records)) => records,
        Some(other) => {
            return Err(Error::MalformedEvent(format!(
                "'{}' must be a list, got {}",
                RECORDS_KEY,
                type_name(&other)
            )))
        }
        None => Vec::new(),
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| change_record(index, record))
        .collect::<Result<Vec<_>>>()
        .map(InboundEvent::Batch)
}

/// Classify and expand into relay units
pub fn normalize(event: Value) -> Result<Vec<RelayUnit>> {
    Ok(classify(event)?.into_units())
}

fn change_record(index: usize, record: Value) -> Result<ChangeRecord> {
    let mut record = match record {
        Value::Object(record) => record,
        other => {
            return Err(Error::MalformedEvent(format!(
                "record {} must be an object, got {}",
                index,
                type_name(&other)
            )))
        }
    };

    match record.remove(KEYS_KEY) {
        Some(Value::Object(keys)) => Ok(ChangeRecord { keys }),
        Some(other) => Err(Error::MalformedEvent(format!(
            "record {} '{}' must be an object, got {}",
            index,
            KEYS_KEY,
            type_name(&other)
        ))),
        None => Err(Error::MalformedEvent(format!(
            "record {} has no '{}'",
            index, KEYS_KEY
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
