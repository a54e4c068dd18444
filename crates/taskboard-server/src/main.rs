//! Taskboard HTTP server.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taskboard_server::http::create_router;
use taskboard_server::{AppState, Config};

/// Taskboard API server.
#[derive(Parser, Debug)]
#[command(name = "taskboard-server", about = "Taskboard API server")]
struct Args {
    /// HTTP server address
    #[arg(long, default_value = "[::1]:8080")]
    http_addr: String,

    /// Maximum number of tasks returned by a single listing
    #[arg(long, default_value = "100")]
    list_limit: usize,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            http_bind_addr: args.http_addr,
            list_limit: args.list_limit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("taskboard_server=info".parse()?))
        .with_target(true)
        .init();

    let config = Config::from(args);
    let http_addr: SocketAddr = config.http_bind_addr.parse()?;
    let state = AppState::with_config(config);

    let listener = TcpListener::bind(http_addr).await?;
    info!(http_addr = %http_addr, "Taskboard server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Taskboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
