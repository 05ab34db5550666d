//! Real-time restaurant floor server.
//!
//! Spawns the floor actor that owns all table state and serves the
//! WebSocket protocol every viewer connects to.

use std::net::SocketAddr;

use anyhow::{Context, Error};
use log::info;
use pico_args::Arguments;
use tabletime::{
    floor::{Floor, TableRegistry},
    sync::{Dispatcher, FloorActor, FloorHandle},
};
use tt_server::{
    api,
    config::ServerConfig,
    logging, metrics,
};

const HELP: &str = "\
Run the restaurant floor server

USAGE:
  tt_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 0.0.0.0:5000]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  ADMIN_USERNAME           Admin login name      [default: admin]
  ADMIN_PASSWORD           Admin login password  [default: 1234]
  CLIENT_CHANNEL_CAPACITY  Outbound events queued per client  [default: 64]
  FLOOR_INBOX_CAPACITY     Pending intents queued for the floor  [default: 256]
  WS_BURST_LIMIT           Frames per second per client  [default: 10]
  WS_SUSTAINED_LIMIT       Frames per minute per client  [default: 100]
  METRICS_BIND             Prometheus exporter address (disabled when unset)
  RUST_LOG                 Log filter (e.g., debug,tabletime=trace)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind: Option<SocketAddr> = pargs
        .opt_value_from_str("--bind")
        .context("Invalid --bind address")?;

    logging::init();

    let config = ServerConfig::from_env(bind)?;
    config.validate()?;

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exported on {}", metrics_bind);
    }

    let registry = TableRegistry::standard();
    info!(
        "Floor layout: {} tables ({})",
        registry.len(),
        registry
            .iter()
            .map(|(id, cap)| format!("{id}:{cap}"))
            .collect::<Vec<_>>()
            .join(" ")
    );

    let dispatcher = Dispatcher::new(Floor::new(&registry), config.admin.credentials());
    let floor = FloorActor::spawn(dispatcher, config.channels.floor_inbox_capacity);

    let app = api::create_router(api::AppState::new(floor.clone(), &config));

    info!("Starting HTTP/WebSocket server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(floor))
        .await
        .context("Server error")?;

    info!("Server stopped");

    Ok(())
}

/// Resolve on Ctrl+C, stopping the floor actor so open sockets close
async fn shutdown_signal(floor: FloorHandle) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutting down server...");
    let _ = floor.shutdown().await;
}
