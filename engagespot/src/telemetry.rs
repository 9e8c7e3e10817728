//! Tracing initialization for the command-line tool.
//!
//! The library only emits `tracing` events; applications embedding it install their own
//! subscriber. The bundled binary logs to stderr, filtered by `RUST_LOG` (default: `info`).
//!
//! ```bash
//! RUST_LOG=engagespot=debug engagespot send --title Hi --recipient a@x.com
//! ```

use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize tracing with a console layer on stderr.
///
/// Stdout is left for command output so it can be piped.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    debug!("Telemetry initialized");
    Ok(())
}
