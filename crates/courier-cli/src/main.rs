//! Courier CLI
//!
//! Resolve the topic address for the current environment and run the relay
//! locally against an SNS endpoint or an in-memory dry-run backend.

mod commands;
mod sns_client;

use clap::{Parser, Subcommand, ValueEnum};
use commands::CommandContext;
use courier_core::CourierConfig;
use courier_relay::logging::{self, LogSink};

#[derive(Parser)]
#[command(name = "courier")]
#[command(author = "Courier Team")]
#[command(version = courier_core::VERSION)]
#[command(about = "Event relay tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "COURIER_CONFIG")]
    config: Option<String>,

    /// Custom SNS endpoint (e.g. http://localhost:4566)
    #[arg(long, global = true, env = "COURIER_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Force local addressing
    #[arg(long, global = true)]
    local: bool,

    /// Access key ID
    #[arg(long, global = true, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key: Option<String>,

    /// Secret access key
    #[arg(long, global = true, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(long, global = true, env = "COURIER_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the topic address the configuration resolves to
    Resolve,

    /// Relay one event read from a file ("-" for stdin)
    Invoke {
        /// Event file
        input: String,

        /// Publish to an in-memory topic instead of SNS
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CourierConfig::from_file(path)?,
        None => CourierConfig::from_env(),
    };
    apply_overrides(&mut config, &cli);

    logging::init(&config.logging, LogSink::Terminal);

    let ctx = CommandContext {
        config,
        output_format: cli.output,
        quiet: cli.quiet,
        access_key: cli.access_key,
        secret_key: cli.secret_key,
    };

    let result = match cli.command {
        Commands::Resolve => commands::resolve::execute(&ctx),
        Commands::Invoke { input, dry_run } => {
            commands::invoke::execute(&ctx, &input, dry_run).await
        }
    };

    if let Err(e) = &result {
        ctx.report_failure(e);
        std::process::exit(1);
    }

    Ok(())
}

/// Command-line flags win over the loaded configuration, but only when given
fn apply_overrides(config: &mut CourierConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint_url {
        config.backend.endpoint_url = Some(endpoint.clone());
    }
    if cli.local {
        config.topic.local = true;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
}
