//! Serve command - runs the HTTP server

use std::path::Path;

use brochure_auth::AuthSettings;
use brochure_core::Config;
use color_eyre::eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::server::{AppState, create_router};

/// Run the serve command.
///
/// Serves the API handlers and the built site. `bind` overrides the
/// configured address.
pub async fn run(config_path: &Path, bind: Option<&str>) -> Result<()> {
    tracing::info!(?config_path, "Starting server");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let settings =
        AuthSettings::from_env(&config.auth).wrap_err("Failed to load auth settings")?;
    let state =
        AppState::from_config(&config, settings).wrap_err("Failed to create server state")?;

    let site_dir = &config.build.output_dir;
    if !site_dir.is_dir() {
        tracing::warn!(
            site_dir = %site_dir.display(),
            "Site directory missing; run `brochure build` first"
        );
    }

    let app = create_router(state, site_dir).layer(TraceLayer::new_for_http());

    let addr = bind.unwrap_or(config.server.bind_addr.as_str());
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();
    tracing::info!(%addr, site_dir = %site_dir.display(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
