//! Structured logging using **tracing**.
//!
//! The library only emits events; installing a subscriber is left to the
//! host (the CLI calls [`init_logging`] once at start-up). Output goes to
//! stderr so stdout stays clean for tables and transformed sources.

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "constinline_core=info,constinline=info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event, for build log collectors
    #[default]
    Json,
    /// Human-readable single-line events
    Compact,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes the global tracing subscriber.
///
/// Returns `false` if a subscriber was already installed (e.g. by a host
/// build tool or a previous call), in which case nothing changes.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=constinline_core=debug`)
pub fn init_logging(format: LogFormat) -> bool {
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_level(true)
            .with_target(true)
            .with_current_span(true)
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_target(false)
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}

/// Initializes JSON logging to stderr.
pub fn init_structured_logging() -> bool {
    init_logging(LogFormat::Json)
}

/// Records the completion of one analysis phase with its item count.
pub fn log_phase(phase: &str, count: usize) {
    info!(phase = %phase, count, "phase complete");
}
