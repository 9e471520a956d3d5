//! SNS client construction for the CLI

use crate::commands::CommandContext;
use anyhow::{bail, Result};
use aws_credential_types::Credentials;
use aws_sdk_sns::config::{BehaviorVersion, Builder as SnsConfigBuilder, Region};
use aws_sdk_sns::Client;
use courier_core::resolver;
use courier_relay::SnsBackend;

/// Create an SNS backend. Explicit keys win over the default credential chain.
pub async fn create_backend(ctx: &CommandContext) -> Result<SnsBackend> {
    match (&ctx.access_key, &ctx.secret_key) {
        (Some(access_key), Some(secret_key)) => {
            let credentials =
                Credentials::new(access_key, secret_key, None, None, "courier-cli");

            let region = ctx
                .config
                .backend
                .region
                .clone()
                .unwrap_or_else(|| resolver::resolve_region(&ctx.config.topic).to_string());

            let mut builder = SnsConfigBuilder::new()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new(region))
                .credentials_provider(credentials);
            if let Some(endpoint) = &ctx.config.backend.endpoint_url {
                builder = builder.endpoint_url(endpoint);
            }

            ctx.debug("Using explicit credentials");
            Ok(SnsBackend::new(Client::from_conf(builder.build())))
        }
        (None, None) => Ok(SnsBackend::from_config(&ctx.config.backend).await),
        _ => bail!("--access-key and --secret-key must be given together"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::context;
    use crate::OutputFormat;
    use courier_core::CourierConfig;

    #[tokio::test]
    async fn test_keys_must_come_in_pairs() {
        let mut ctx = context(CourierConfig::default(), OutputFormat::Text);
        ctx.access_key = Some("AKIDEXAMPLE".into());
        let err = create_backend(&ctx).await.err().unwrap();
        assert!(err.to_string().contains("must be given together"));

        ctx.access_key = None;
        ctx.secret_key = Some("secret".into());
        assert!(create_backend(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_explicit_keys_build_a_backend() {
        let mut ctx = context(CourierConfig::default(), OutputFormat::Text);
        ctx.access_key = Some("AKIDEXAMPLE".into());
        ctx.secret_key = Some("secret".into());
        ctx.config.backend.endpoint_url = Some("http://localhost:4566".into());

        let backend = create_backend(&ctx).await.unwrap();
        let region = backend.client().config().region().map(|r| r.to_string());
        assert_eq!(region.as_deref(), Some("us-west-1"));
    }
}
