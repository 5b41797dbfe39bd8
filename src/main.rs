//! Standalone envelope server.
//!
//! Serves the built-in routes behind the envelope filter. Mostly useful to
//! check a configuration file and see the envelope shapes on the wire.
//!
//! ```text
//! response-envelope --config envelope.toml --debug
//! ```

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tokio::net::TcpListener;

use response_envelope::config::{load_config, AppConfig, ConfigError};
use response_envelope::http::{routes::service_routes, HttpServer};
use response_envelope::lifecycle::{wait_for_signal, Shutdown};
use response_envelope::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "response-envelope")]
#[command(about = "HTTP server wrapping every response in a JSON envelope", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Include exception detail in error envelopes.
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Error)]
enum ServerError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if cli.debug {
        config.envelope.debug_mode = true;
    }

    init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        debug_mode = config.envelope.debug_mode,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if let Err(err) = wait_for_signal().await {
            tracing::error!(error = %err, "Signal handler failed, shutting down");
        }
        shutdown.trigger();
    });

    let server = HttpServer::new(config, service_routes());
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
