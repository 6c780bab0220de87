//! `hermes run`: start the broker.
//!
//! Resolves configuration (defaults, config file, CLI overrides), binds
//! the registration listener and the HTTP server, and runs both until
//! Ctrl+C / SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::model::Config;
use crate::config::{self, validation};
use crate::directory::Directory;
use crate::error::HermesError;
use crate::logging;
use crate::server::{self, AppState};

/// Apply CLI / env overrides on top of the file or default config.
pub fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(ref host) = args.host {
        config.listen.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.listen.port = port;
    }
    if let Some(ref host) = args.control_host {
        config.control.host.clone_from(host);
    }
    if let Some(port) = args.control_port {
        config.control.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.forward.timeout = timeout;
    }
    if let Some(max_body) = args.max_body {
        config.forward.max_body = max_body;
    }
}

pub async fn execute(args: RunArgs) -> Result<(), HermesError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let mut loaded = config::load(args.config.as_deref()).await?;
    apply_overrides(&mut loaded.config, &args);
    if let Err(errors) = validation::validate(&loaded.config) {
        return Err(HermesError::ConfigValidation { errors });
    }

    let http_addr = SocketAddr::new(
        loaded.config.listen.host.parse::<IpAddr>()?,
        loaded.config.listen.port,
    );
    let control_addr = SocketAddr::new(
        loaded.config.control.host.parse::<IpAddr>()?,
        loaded.config.control.port,
    );
    let max_body = loaded.config.forward.max_body;
    let timeout_ms = loaded.config.forward.timeout;

    let directory = Arc::new(Directory::new());
    let state = Arc::new(AppState::new(Arc::clone(&directory), loaded));

    // Shutdown signal: sending `true` stops the control listener loop
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let control_listener = server::bind_control_listener(control_addr).await?;
    let control_handle = server::spawn_control_listener(control_listener, directory, shutdown_rx);

    let router = server::build_router(state, max_body);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;

    tracing::info!(
        addr = %http_addr,
        control = %control_addr,
        timeout_ms,
        "hermes started"
    );

    let graceful_shutdown = async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(graceful_shutdown)
        .await?;

    // Wait for the control listener to finish (catches panics)
    if let Err(e) = control_handle.await {
        tracing::error!(error = %e, "control listener task failed");
    }

    tracing::info!("hermes stopped");
    Ok(())
}
