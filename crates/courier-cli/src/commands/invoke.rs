//! invoke command - relay one event

use super::CommandContext;
use crate::sns_client::create_backend;
use anyhow::{Context, Result};
use courier_relay::{MemoryBackend, Relay, RelayResponse};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;

/// Queue subscribed to the in-memory topic during a dry run
const DRY_RUN_QUEUE: &str = "courier-dry-run";

#[derive(Serialize)]
struct InvokeResult {
    response: RelayResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivered: Option<Vec<Value>>,
}

pub async fn execute(ctx: &CommandContext, input: &str, dry_run: bool) -> Result<()> {
    let event = read_event(input)?;

    let result = if dry_run {
        let backend = Arc::new(MemoryBackend::new());
        let relay = Relay::from_config(backend.clone(), &ctx.config)?;
        backend.create_topic(relay.address());
        backend.subscribe(relay.address(), "sqs", DRY_RUN_QUEUE)?;

        ctx.debug(&format!("Dry run against {}", relay.address()));
        let response = relay.handle(event).await.context("Relay failed")?;

        let delivered = backend
            .receive(DRY_RUN_QUEUE, usize::MAX)
            .iter()
            .map(|m| m.notification_body())
            .collect::<courier_core::Result<Vec<_>>>()?;

        InvokeResult {
            response,
            delivered: Some(delivered),
        }
    } else {
        let backend = create_backend(ctx).await?;
        let relay = Relay::from_config(Arc::new(backend), &ctx.config)?;

        ctx.debug(&format!("Publishing to {}", relay.address()));
        let response = relay.handle(event).await.context("Relay failed")?;

        InvokeResult {
            response,
            delivered: None,
        }
    };

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    ctx.status("relayed", format!("status {}", result.response.status_code));
    println!("{}", result.response.body);

    if let Some(delivered) = &result.delivered {
        ctx.status("delivered", format!("{} notification(s)", delivered.len()));
        for body in delivered {
            println!("{}", serde_json::to_string(body)?);
        }
    }

    Ok(())
}

fn read_event(input: &str) -> Result<Value> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read event from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };

    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", input))
}
