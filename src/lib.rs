pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use config::Config;

pub async fn run() -> anyhow::Result<()> {
    Config::create_default_if_missing()?;

    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("StudyHub v{} starting...", env!("CARGO_PKG_VERSION"));

    let state = api::create_app_state(config.clone()).await?;

    // Hourly sweep of expired session rows; `load` already ignores
    // them, this reclaims the space. First tick fires at startup.
    let session_store = state.store.session_store();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match session_store.delete_expired().await {
                Ok(0) => {}
                Ok(n) => info!("Reclaimed {n} expired sessions"),
                Err(e) => error!("Expired-session sweep failed: {e}"),
            }
        }
    });

    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {e}"),
    }
}
