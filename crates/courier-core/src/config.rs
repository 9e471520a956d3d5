//! Configuration for Courier
//!
//! A [`CourierConfig`] is assembled once when the execution environment
//! starts and handed to everything downstream. Nothing past this module
//! reads the process environment.

use crate::types::MessageAttribute;
use crate::{DEFAULT_ACCOUNT_ID, DEFAULT_LOCAL_TOPIC_ADDRESS, DEFAULT_REGION, DEFAULT_TOPIC_NAME};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

/// Maximum length SNS accepts for a message subject
pub const MAX_SUBJECT_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub topic: TopicConfig,

    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CourierConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an environment snapshot.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        // Topic addressing
        if let Some(mode) = var("COURIER_ADDRESSING_MODE") {
            match mode.parse::<AddressingMode>() {
                Ok(mode) => config.topic.mode = mode,
                Err(e) => warn!("Ignoring COURIER_ADDRESSING_MODE: {}", e),
            }
        }
        if let Some(arn) = var("COURIER_TOPIC_ARN") {
            config.topic.mode = AddressingMode::Fixed;
            config.topic.fixed_address = Some(arn);
        }
        if let Some(arn) = var("COURIER_LOCAL_TOPIC_ARN") {
            config.topic.local_address = arn;
        }
        if let Some(name) = var("COURIER_TOPIC_NAME") {
            config.topic.topic_name = name;
        }
        config.topic.local = var("IS_LOCAL").map(|v| parse_flag(&v)).unwrap_or(false);
        config.topic.region_override = var("COURIER_REGION");
        config.topic.platform_region = var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION"));
        config.topic.account_override = var("COURIER_ACCOUNT_ID").or_else(|| var("AWS_ACCOUNT_ID"));

        // Publish options
        config.publish.subject = var("COURIER_SUBJECT");
        if let Some(raw) = var("COURIER_MESSAGE_ATTRIBUTES") {
            match serde_json::from_str::<BTreeMap<String, MessageAttribute>>(&raw) {
                Ok(attributes) => config.publish.attributes = attributes,
                Err(e) => warn!("Ignoring COURIER_MESSAGE_ATTRIBUTES: {}", e),
            }
        }

        // Backend client
        config.backend.endpoint_url = var("COURIER_ENDPOINT_URL").or_else(|| var("AWS_ENDPOINT_URL"));
        config.backend.region = var("COURIER_BACKEND_REGION");

        if let Some(level) = var("COURIER_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = var("COURIER_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.publish.validate()?;
        self.logging.validate()
    }
}

/// How the destination topic address is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// Always use `fixed_address`
    Fixed,
    /// Always compose the address from region, account and topic name
    Composed,
    /// Use `local_address` when the local flag is set, otherwise compose
    #[default]
    Switched,
}

impl FromStr for AddressingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(AddressingMode::Fixed),
            "composed" => Ok(AddressingMode::Composed),
            "switched" => Ok(AddressingMode::Switched),
            other => Err(format!("unknown addressing mode '{}'", other)),
        }
    }
}

/// Inputs of the topic address resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    #[serde(default)]
    pub mode: AddressingMode,

    /// Address used in fixed mode
    #[serde(default)]
    pub fixed_address: Option<String>,

    /// Local/dev flag consulted in switched mode
    #[serde(default)]
    pub local: bool,

    #[serde(default = "default_local_address")]
    pub local_address: String,

    #[serde(default = "default_topic_name")]
    pub topic_name: String,

    /// Explicit region, wins over the platform region
    #[serde(default)]
    pub region_override: Option<String>,

    /// Region reported by the hosting platform
    #[serde(default)]
    pub platform_region: Option<String>,

    #[serde(default = "default_region")]
    pub fallback_region: String,

    #[serde(default)]
    pub account_override: Option<String>,

    #[serde(default = "default_account_id")]
    pub fallback_account: String,
}

fn default_local_address() -> String {
    DEFAULT_LOCAL_TOPIC_ADDRESS.to_string()
}

fn default_topic_name() -> String {
    DEFAULT_TOPIC_NAME.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_account_id() -> String {
    DEFAULT_ACCOUNT_ID.to_string()
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            mode: AddressingMode::default(),
            fixed_address: None,
            local: false,
            local_address: default_local_address(),
            topic_name: default_topic_name(),
            region_override: None,
            platform_region: None,
            fallback_region: default_region(),
            account_override: None,
            fallback_account: default_account_id(),
        }
    }
}

/// Static options attached to every outbound notification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, MessageAttribute>,
}

impl PublishConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(ref subject) = self.subject {
            if subject.is_empty() || subject.chars().count() > MAX_SUBJECT_LENGTH {
                return Err(crate::Error::Config(format!(
                    "Subject must be 1-{} characters",
                    MAX_SUBJECT_LENGTH
                )));
            }
            if subject.chars().any(|c| c.is_control()) {
                return Err(crate::Error::Config(
                    "Subject must not contain control characters".into(),
                ));
            }
        }

        for (name, attribute) in &self.attributes {
            if name.is_empty() {
                return Err(crate::Error::Config("Attribute name must not be empty".into()));
            }
            attribute.validate().map_err(|e| {
                crate::Error::Config(format!("Invalid attribute '{}': {}", name, e))
            })?;
        }

        Ok(())
    }
}

/// Messaging backend client settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Custom endpoint (e.g. LocalStack)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Region for the client itself; the SDK default chain applies when unset
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    pub fn validate(&self) -> crate::Result<()> {
        match self.format.to_ascii_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(crate::Error::Config(format!(
                "Unknown log format '{}', expected 'pretty' or 'json'",
                other
            ))),
        }
    }
}

/// Interpret a boolean-like environment value
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
