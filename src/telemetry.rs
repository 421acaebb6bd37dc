use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Initialize structured logging for the process
///
/// JSON output with span context, filtered by RUST_LOG when set and by the
/// configured level otherwise. Called once by the binary; the library
/// itself never installs a subscriber.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    if !config.tracing_enabled {
        return Ok(());
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true),
        )
        .with(filter)
        .init();

    tracing::debug!("userdir telemetry initialized");
    Ok(())
}
