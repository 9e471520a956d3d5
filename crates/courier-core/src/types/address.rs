//! Topic addresses
//!
//! An address has the SNS ARN shape `arn:<partition>:sns:<region>:<account>:<topic>`.
//! Composed addresses always use the `aws` partition.

use crate::{Error, Result, ARN_SCHEME};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully resolved destination of a publish call
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicAddress(String);

impl TopicAddress {
    /// Compose an address from its parts
    pub fn compose(region: &str, account_id: &str, topic_name: &str) -> Result<Self> {
        check_component("region", region)?;
        check_component("account", account_id)?;
        check_component("topic name", topic_name)?;

        Ok(Self(format!(
            "{}:{}:{}:{}",
            ARN_SCHEME, region, account_id, topic_name
        )))
    }

    /// Parse and validate a complete address in any partition
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim();
        let not_an_address = || {
            Error::ConfigurationGap(format!(
                "'{}' is not a topic address (expected arn:<partition>:sns:<region>:<account>:<topic>)",
                address
            ))
        };

        let parts: Vec<&str> = address.split(':').collect();
        let [scheme, partition, service, region, account_id, topic_name] = parts[..] else {
            return Err(not_an_address());
        };
        if scheme != "arn" || service != "sns" {
            return Err(not_an_address());
        }

        check_component("partition", partition)?;
        check_component("region", region)?;
        check_component("account", account_id)?;
        check_component("topic name", topic_name)?;

        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn partition(&self) -> &str {
        self.part(1)
    }

    pub fn region(&self) -> &str {
        self.part(3)
    }

    pub fn account_id(&self) -> &str {
        self.part(4)
    }

    pub fn topic_name(&self) -> &str {
        self.part(5)
    }

    fn part(&self, index: usize) -> &str {
        self.0.split(':').nth(index).unwrap_or("")
    }
}

fn check_component(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::ConfigurationGap(format!("{} is empty", what)));
    }
    if value.contains(':') || value.chars().any(char::is_whitespace) {
        return Err(Error::ConfigurationGap(format!(
            "{} '{}' contains ':' or whitespace",
            what, value
        )));
    }
    Ok(())
}

impl fmt::Display for TopicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TopicAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TopicAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TopicAddress> for String {
    fn from(address: TopicAddress) -> Self {
        address.0
    }
}
