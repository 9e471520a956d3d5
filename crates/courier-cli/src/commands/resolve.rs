//! resolve command - show the destination topic address

use super::CommandContext;
use anyhow::{Context, Result};
use colored::Colorize;
use courier_core::config::AddressingMode;
use courier_core::resolver;
use serde::Serialize;

#[derive(Serialize)]
struct ResolveResult {
    topic_arn: String,
    mode: AddressingMode,
    local: bool,
    region: String,
    account_id: String,
    topic_name: String,
}

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let topic = &ctx.config.topic;
    let address = resolver::resolve(topic).context("Failed to resolve topic address")?;

    let result = ResolveResult {
        topic_arn: address.to_string(),
        mode: topic.mode,
        local: topic.local,
        region: address.region().to_string(),
        account_id: address.account_id().to_string(),
        topic_name: address.topic_name().to_string(),
    };

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", result.topic_arn);
    if !ctx.quiet {
        println!("  {:<10} {:?}", "mode".cyan(), result.mode);
        println!("  {:<10} {}", "local".cyan(), result.local);
        println!("  {:<10} {}", "region".cyan(), result.region);
        println!("  {:<10} {}", "account".cyan(), result.account_id);
        println!("  {:<10} {}", "topic".cyan(), result.topic_name);
    }

    Ok(())
}
