//! Wurstmineberg tray agent entry point.

mod app;
mod config;
mod launch;
mod scheduler;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting Wurstmineberg tray agent"
    );

    let config = config::Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load configuration, using defaults");
        config::Config::default()
    });
    tracing::info!(
        base_url = %config.base_url,
        main_world = %config.main_world,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(config))?;

    tracing::info!("agent shut down cleanly");
    Ok(())
}
