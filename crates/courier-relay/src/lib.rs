//! Courier Relay
//!
//! Receives an inbound event, splits it into relay units and republishes
//! each unit as a notification on a pub/sub topic.
//!
//! ```text
//! platform ──▶ Relay ──┬─▶ normalizer (units)
//!                      ├─▶ resolver (address, once per environment)
//!                      └─▶ Publisher ──▶ NotificationBackend ──▶ subscribers
//! ```

pub mod backend;
pub mod logging;
mod orchestrator;
mod publisher;

pub use backend::{MemoryBackend, NotificationBackend, QueueMessage, SnsBackend};
pub use orchestrator::Relay;
pub use publisher::Publisher;

// Re-export types from core
pub use courier_core::types::{
    InboundEvent, MessageAttribute, OutboundNotification, PublishResult, RelayMode, RelayResponse,
    RelayUnit, TopicAddress,
};
pub use courier_core::{CourierConfig, Error, Result};
