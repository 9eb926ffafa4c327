//! Sheetstore Server Daemon
//!
//! The `sheetstored` binary is the sheetstore server process that:
//! - Opens the grid store (file-backed or in-memory)
//! - Provisions the default tab with the standard header row
//! - Serves the JSON line protocol for client connections
//! - Handles graceful shutdown on SIGTERM/SIGINT
//!
//! # Usage
//!
//! ```bash
//! # Start with the file-backed store under ./data
//! sheetstored --token <shared-secret>
//!
//! # Custom data directory and port
//! sheetstored --data-dir /var/lib/sheetstore --port 7451
//!
//! # In-memory store (nothing persisted)
//! sheetstored --memory
//!
//! # Use a configuration file
//! sheetstored --config /etc/sheetstore/sheetstored.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sheetstore_core::{standard_headers, FileBackend, GridBackend, MemoryBackend};
use sheetstore_server::{ApiService, Server, ServerConfig};

/// Sheetstore Server Daemon
#[derive(Parser, Debug)]
#[command(
    name = "sheetstored",
    version,
    about = "Sheetstore row-store server",
    long_about = "Serves a spreadsheet-like row store over a JSON line protocol.\n\n\
                  Rows are addressed by the (address, auction_name, auction_date)\n\
                  composite key; listings support date filtering and pagination."
)]
struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEETSTORE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value_t = 7450, env = "SHEETSTORE_PORT")]
    port: u16,

    /// Data directory for the file-backed store
    #[arg(short = 'd', long, value_name = "DIR", env = "SHEETSTORE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run with the in-memory store (no persistence)
    #[arg(long)]
    memory: bool,

    /// Shared authentication token
    #[arg(long, env = "SHEETSTORE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Default store id
    #[arg(long, env = "SHEETSTORE_SHEET_ID")]
    sheet_id: Option<String>,

    /// Default tab name
    #[arg(long, env = "SHEETSTORE_DEFAULT_TAB")]
    default_tab: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", env = "SHEETSTORE_LOG_LEVEL")]
    log_level: String,

    /// Print configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let config = load_config(&args)?;

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    run_server(config).await
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else {
        &args.log_level
    };

    let filter = EnvFilter::try_new(format!(
        "sheetstore_server={level},sheetstore_core={level}"
    ))
    .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn load_config(args: &Args) -> Result<ServerConfig> {
    let mut config = if let Some(path) = &args.config {
        ServerConfig::from_file(path).context("Failed to load config file")?
    } else {
        ServerConfig::default()
    };

    // Command-line arguments override the file.
    config.host = args.host.clone();
    config.port = args.port;

    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if args.memory {
        config.memory_mode = true;
    }
    if let Some(token) = &args.token {
        config.shared_token = token.clone();
    }
    if let Some(id) = &args.sheet_id {
        config.sheet_id = id.clone();
    }
    if let Some(tab) = &args.default_tab {
        config.default_tab = tab.clone();
    }

    Ok(config)
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!("sheetstored v{}", env!("CARGO_PKG_VERSION"));

    let backend: Arc<dyn GridBackend> = if config.memory_mode {
        info!("Using in-memory store (data will not be persisted)");
        Arc::new(MemoryBackend::new())
    } else {
        let dir = config.effective_data_dir();
        std::fs::create_dir_all(&dir).context("Failed to create data directory")?;
        info!("Data directory: {}", dir.display());
        Arc::new(FileBackend::new(dir))
    };

    if config.shared_token.is_empty() {
        warn!("Shared token is empty; requests without a token will be accepted");
    }

    // Bootstrap the default tab so first writes have a header to
    // project against.
    let created = backend
        .create_tab(&config.sheet_id, &config.default_tab, &standard_headers())
        .map_err(|e| anyhow::anyhow!("Failed to provision default tab: {e}"))?;
    if created {
        info!(
            "Provisioned tab '{}' in store '{}'",
            config.default_tab, config.sheet_id
        );
    }

    let addr = config.socket_addr();
    info!("Server configuration:");
    info!("  Listen address: {}", addr);
    info!("  Default store:  {}", config.sheet_id);
    info!("  Default tab:    {}", config.default_tab);
    info!("  Memory mode:    {}", config.memory_mode);

    let service = Arc::new(ApiService::from_config(&config, backend));
    let server = Server::new(service, addr);

    info!("Press Ctrl+C to shutdown");

    tokio::select! {
        result = server.serve() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(anyhow::anyhow!("Server error: {}", e));
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
