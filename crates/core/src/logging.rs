//! Logging setup shared by the server binary.
//!
//! A thin layer over `tracing-subscriber`: pick an output format, optionally
//! narrow the filter, and initialize the global subscriber once at startup.

use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry, util::SubscriberInitExt,
};

/// Filter applied when neither the config nor `RUST_LOG` names one.
const DEFAULT_FILTER: &str = "info,folio=debug";

/// How log lines are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single line per event, the development default
    #[default]
    Full,
    /// Multi-line with colors, for reading dense debug output
    Pretty,
    /// Single line with abbreviated metadata
    Compact,
    /// One JSON object per event, for log aggregation
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Output format
    pub format: LogFormat,
    /// Filter directive such as `info,folio=debug`; falls back to
    /// `RUST_LOG`, then to the built-in default
    pub filter: Option<String>,
    /// Annotate events with file and line
    pub include_location: bool,
}

/// Build the event filter from an explicit directive, `RUST_LOG`, or the
/// built-in default, in that order
fn build_filter(
    directive: Option<&str>,
) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
    match directive {
        Some(directive) => Ok(EnvFilter::try_new(directive)?),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Install the global tracing subscriber
///
/// Fails if the filter directive does not parse or a subscriber is already
/// installed.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = build_filter(config.filter.as_deref())?;

    let layer = match config.format {
        LogFormat::Full => fmt::layer()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    registry().with(layer.with_filter(filter)).try_init()?;

    tracing::debug!(format = ?config.format, "Logging initialized");
    Ok(())
}
