use clap::Parser;
use list_table_server::config::{load_config, DEFAULT_CONFIG_PATH};
use list_table_server::lifecycle::{setup_tracing, AdminSystem};
use list_table_server::server;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "list-table-server", about = "Serve an AJAX list table")]
struct Args {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address; overrides `bind` from the configuration.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let args = Args::parse();

    // An explicit --config must exist; the default path is optional.
    let (path, allow_missing) = match args.config {
        Some(path) => (path, false),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), true),
    };
    let mut config = load_config(&path, allow_missing).map_err(|e| e.to_string())?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    info!(config = %path.display(), bind = %config.bind, "Starting list table server");

    let system = Arc::new(AdminSystem::new(&config));
    let listener = server::bind(&config.bind).await.map_err(|e| e.to_string())?;

    server::serve(listener, system, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await;

    info!("Server stopped");
    Ok(())
}
