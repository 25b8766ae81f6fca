//! Tracing subscriber setup for the binary.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text logs.
    #[default]
    Text,
    /// Structured JSON logs.
    Json,
}

/// Install the global subscriber.
///
/// `level` is an env-filter expression (e.g. `info` or
/// `krex_k8s=debug,info`); color is used only when stdout is a terminal.
pub fn init(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level)?;

    match format {
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_ansi(std::io::stdout().is_terminal())
                .with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer().json().with_ansi(false).with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }
    Ok(())
}
