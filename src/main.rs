//! emcomd - emergency communications daemon.

use emcomd::config::Config;
use emcomd::handlers::Registry;
use emcomd::network::Gateway;
use emcomd::report::spawn_report_task;
use emcomd::state::{Matrix, MatrixConfig};
use emcomd::store;
use emcomd::telemetry::init_tracing;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "emcomd.toml".to_string());

    let missing = !Path::new(&config_path).exists();
    let config = if missing {
        Config::default()
    } else {
        Config::load(&config_path).map_err(|e| {
            eprintln!("emcomd: failed to load {config_path}: {e}");
            e
        })?
    };

    init_tracing(config.logging.format);
    if missing {
        warn!(path = %config_path, "Config file not found, using defaults");
    }

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        "Starting emcomd"
    );

    let store = store::open(&config.storage).await.map_err(|e| {
        error!(error = %e, "Failed to open log store");
        e
    })?;
    let matrix = Arc::new(Matrix::load(MatrixConfig::from(&config), store).await?);
    let registry = Arc::new(Registry::new());

    spawn_report_task(
        Arc::clone(&matrix),
        Arc::clone(&registry),
        config.report.interval_secs,
    );

    let gateway = Gateway::bind(
        config.listen.address,
        config.listen.max_sessions,
        matrix,
        registry,
    )
    .await?;

    gateway
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
