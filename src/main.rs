//! micro-web demo server.
//!
//! Serves service info as JSON on `/` and files from a directory as
//! attachments on `/files/{name}`.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use micro_web::config::validation::validate_config;
use micro_web::config::{load_config, AppConfig, ConfigError};
use micro_web::lifecycle::{signals, Shutdown};
use micro_web::observability::logging;
use micro_web::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "micro-web")]
#[command(about = "Serve JSON responses and file attachments", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override files.root
    #[arg(long)]
    files_root: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(root) = args.files_root {
        config.files.root = root;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability.log_filter);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        files_root = %config.files.root,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::shutdown_on_ctrl_c(&shutdown).await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
