//! Error types for Courier

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The topic address could not be resolved to a usable value
    #[error("Topic address could not be resolved: {0}")]
    ConfigurationGap(String),

    /// A relay unit could not be encoded as JSON text
    #[error("Failed to serialize relay unit: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The messaging backend rejected the publish call or was unreachable
    #[error("Publish to {topic} failed: {message}")]
    Publish { topic: String, message: String },

    /// A batch event did not have the expected shape
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// A subscription could not be created on the messaging backend
    #[error("Subscription failed: {0}")]
    Subscription(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Publish {
            topic: topic.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::ConfigurationGap(_) => "ConfigurationGap",
            Error::Serialization(_) => "SerializationFailure",
            Error::Publish { .. } => "PublishFailure",
            Error::MalformedEvent(_) => "MalformedEvent",
            Error::Subscription(_) => "SubscriptionFailure",
            Error::Config(_) => "ConfigurationError",
        }
    }
}
