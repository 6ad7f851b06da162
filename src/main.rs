//! Contact form edge service.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌────────────────────────────────────────────────┐
//!                       │                 CONTACT EDGE                   │
//!   Form POST           │  ┌──────────┐   ┌──────────┐   ┌───────────┐   │
//!   ────────────────────┼─▶│  http    │──▶│ antispam │──▶│rate_limit │   │
//!                       │  │ handlers │   │ honeypot │   │  ledger   │   │
//!                       │  └──────────┘   │  timing  │   └─────┬─────┘   │
//!                       │                 └──────────┘         ▼         │
//!   { success | error } │  ┌──────────┐                  ┌───────────┐   │
//!   ◀───────────────────┼──│ response │◀─────────────────│ forwarder │───┼──▶ Webhook
//!                       │  └──────────┘                  └───────────┘   │
//!                       │                                                │
//!                       │  config (TOML + env, hot reload)               │
//!                       │  observability · lifecycle (signals, shutdown) │
//!                       └────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use contact_edge::config::{loader, watcher::ConfigWatcher};
use contact_edge::lifecycle::signals::shutdown_on_signal;
use contact_edge::observability::{logging, metrics};
use contact_edge::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "contact-edge")]
#[command(about = "Rate-limited contact form relay", long_about = None)]
struct Args {
    /// TOML config file. Watched for changes when given.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => loader::load_from_env()?,
    };

    logging::init(&config.observability.log_level);
    tracing::info!("contact-edge v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoint = %config.listener.endpoint_path,
        webhook_configured = config.webhook.url.is_some(),
        window_secs = config.rate_limit.window_secs,
        max_submissions = config.rate_limit.max_submissions,
        "Configuration loaded"
    );
    if config.webhook.url.is_none() {
        tracing::warn!(
            "No webhook URL configured; submissions will fail until {} or webhook.url is set",
            loader::WEBHOOK_URL_ENV
        );
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.listener.clone());
            match watcher.run() {
                Ok(handle) => (updates, Some(handle)),
                Err(e) => {
                    tracing::error!(error = %e, "Config hot reload disabled");
                    (updates, None)
                }
            }
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let addr: SocketAddr = bind_address.parse()?;
            server.run_tls(addr, &tls, config_updates, shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener, config_updates, shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
