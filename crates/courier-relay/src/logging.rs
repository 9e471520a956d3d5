//! Tracing subscriber setup shared by the binaries

use courier_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where log lines end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// Interactive terminal. Logs go to stderr so stdout stays parseable.
    Terminal,
    /// Hosting platform log collector, which stamps its own timestamps
    Platform,
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig, sink: LogSink) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    match (config.is_json(), sink) {
        (true, LogSink::Terminal) => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init(),
        (true, LogSink::Platform) => registry
            .with(fmt::layer().json().with_target(true).without_time())
            .init(),
        (false, LogSink::Terminal) => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
        (false, LogSink::Platform) => registry
            .with(fmt::layer().with_target(true).with_ansi(false).without_time())
            .init(),
    }
}
