//! Topic address resolution
//!
//! Resolution is a pure function of a [`TopicConfig`]. It runs once per
//! execution environment and the result is reused by every invocation.

use crate::config::{AddressingMode, TopicConfig};
use crate::types::TopicAddress;
use crate::{Error, Result};
use tracing::debug;

/// Resolve the destination topic address
pub fn resolve(config: &TopicConfig) -> Result<TopicAddress> {
    let address = match config.mode {
        AddressingMode::Fixed => {
            let fixed = config.fixed_address.as_deref().ok_or_else(|| {
                Error::ConfigurationGap("fixed addressing selected but no address set".into())
            })?;
            TopicAddress::parse(fixed)?
        }
        AddressingMode::Composed => compose(config)?,
        AddressingMode::Switched if config.local => TopicAddress::parse(&config.local_address)?,
        AddressingMode::Switched => compose(config)?,
    };

    debug!("Resolved topic address {} ({:?} mode)", address, config.mode);
    Ok(address)
}

/// Region: explicit override, then platform region, then fallback
pub fn resolve_region(config: &TopicConfig) -> &str {
    config
        .region_override
        .as_deref()
        .or(config.platform_region.as_deref())
        .unwrap_or(&config.fallback_region)
}

/// Account: explicit override, then fallback
pub fn resolve_account(config: &TopicConfig) -> &str {
    config
        .account_override
        .as_deref()
        .unwrap_or(&config.fallback_account)
}

fn compose(config: &TopicConfig) -> Result<TopicAddress> {
    TopicAddress::compose(
        resolve_region(config),
        resolve_account(config),
        &config.topic_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CourierConfig, DEFAULT_LOCAL_TOPIC_ADDRESS};

    #[test]
    fn test_default_resolves_to_composed_fallbacks() {
        let address = resolve(&TopicConfig::default()).unwrap();
        assert_eq!(address.as_str(), "arn:aws:sns:us-west-1:000000000000:teste");
    }

    #[test]
    fn test_region_chain() {
        let mut config = TopicConfig::default();
        assert_eq!(resolve_region(&config), "us-west-1");

        config.platform_region = Some("us-east-1".into());
        assert_eq!(resolve_region(&config), "us-east-1");

        config.region_override = Some("eu-central-1".into());
        assert_eq!(resolve_region(&config), "eu-central-1");
    }

    #[test]
    fn test_account_chain() {
        let mut config = TopicConfig::default();
        assert_eq!(resolve_account(&config), "000000000000");

        config.account_override = Some("123456789012".into());
        assert_eq!(resolve_account(&config), "123456789012");
    }

    #[test]
    fn test_fixed_mode() {
        let config = TopicConfig {
            mode: AddressingMode::Fixed,
            fixed_address: Some("arn:aws:sns:ap-south-1:111111111111:events".into()),
            platform_region: Some("us-east-1".into()),
            ..TopicConfig::default()
        };
        let address = resolve(&config).unwrap();
        assert_eq!(address.as_str(), "arn:aws:sns:ap-south-1:111111111111:events");
    }

    #[test]
    fn test_fixed_mode_without_address_is_a_gap() {
        let config = TopicConfig {
            mode: AddressingMode::Fixed,
            ..TopicConfig::default()
        };
        let err = resolve(&config).unwrap_err();
        assert_eq!(err.code(), "ConfigurationGap");
    }

    #[test]
    fn test_switched_local_uses_local_address() {
        let config = TopicConfig {
            local: true,
            platform_region: Some("eu-west-1".into()),
            ..TopicConfig::default()
        };
        assert_eq!(resolve(&config).unwrap().as_str(), DEFAULT_LOCAL_TOPIC_ADDRESS);
    }

    #[test]
    fn test_switched_non_local_composes() {
        let config = TopicConfig {
            local: false,
            platform_region: Some("eu-west-1".into()),
            account_override: Some("123456789012".into()),
            ..TopicConfig::default()
        };
        assert_eq!(
            resolve(&config).unwrap().as_str(),
            "arn:aws:sns:eu-west-1:123456789012:teste"
        );
    }

    #[test]
    fn test_composed_ignores_local_flag() {
        let config = TopicConfig {
            mode: AddressingMode::Composed,
            local: true,
            ..TopicConfig::default()
        };
        assert_eq!(
            resolve(&config).unwrap().as_str(),
            "arn:aws:sns:us-west-1:000000000000:teste"
        );
    }

    #[test]
    fn test_unusable_values_are_gaps() {
        let config = TopicConfig {
            local: true,
            local_address: "topic_arn_placeholder".into(),
            ..TopicConfig::default()
        };
        assert_eq!(resolve(&config).unwrap_err().code(), "ConfigurationGap");

        let config = TopicConfig {
            fallback_region: String::new(),
            ..TopicConfig::default()
        };
        assert_eq!(resolve(&config).unwrap_err().code(), "ConfigurationGap");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let config = CourierConfig::from_lookup(|name| match name {
            "AWS_REGION" => Some("sa-east-1".to_string()),
            "AWS_ACCOUNT_ID" => Some("222222222222".to_string()),
            _ => None,
        });
        let first = resolve(&config.topic).unwrap();
        let second = resolve(&config.topic).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "arn:aws:sns:sa-east-1:222222222222:teste");
    }
}
