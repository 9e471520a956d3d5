//! CLI command implementations

pub mod invoke;
pub mod resolve;

use crate::OutputFormat;
use colored::Colorize;
use courier_core::CourierConfig;
use serde_json::json;

/// Settings shared by every subcommand
pub struct CommandContext {
    pub config: CourierConfig,
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl CommandContext {
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// Progress line such as `relayed: status 200`. Suppressed by `--quiet`.
    pub fn status(&self, label: &str, detail: impl std::fmt::Display) {
        if !self.quiet {
            println!("{}: {}", label.green(), detail);
        }
    }

    pub fn debug(&self, msg: &str) {
        tracing::debug!("{}", msg);
    }

    /// Report a failed command on stderr in the selected output format
    pub fn report_failure(&self, err: &anyhow::Error) {
        eprintln!("{}", self.render_failure(err));
    }

    fn render_failure(&self, err: &anyhow::Error) -> String {
        let message = format!("{:#}", err);
        let code = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<courier_core::Error>())
            .map(courier_core::Error::code);

        if self.is_json() {
            json!({"error": message, "code": code}).to_string()
        } else {
            match code {
                Some(code) => format!("{} [{}] {}", "error:".red().bold(), code, message),
                None => format!("{} {}", "error:".red().bold(), message),
            }
        }
    }
}
