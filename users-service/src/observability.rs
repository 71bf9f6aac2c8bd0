//! Tracing initialisation

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Install the global JSON subscriber
///
/// `service.log_level` accepts a bare level or a full `EnvFilter` directive.
/// An unparseable directive falls back to `info`.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.service.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Tracing initialized"
    );

    Ok(())
}

/// Flush hook called on shutdown
pub fn shutdown_tracing() {
    tracing::info!("Tracing shutdown complete");
}
