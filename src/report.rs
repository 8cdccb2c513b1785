//! Periodic report task.
//!
//! Every `[report] interval_secs` the list of connected clients is appended
//! to the reports log as a three line block:
//!
//! ```text
//! Relatório Periódico - 2025-03-01T10:00:00.000
//! Clientes Conectados: [alice, bob]
//! -----------------------------
//! ```

use crate::handlers::Registry;
use crate::state::Matrix;
use crate::store::{LogKind, StoreError};
use crate::telemetry::spans;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{Instrument, info, warn};

const SEPARATOR: &str = "-----------------------------";

/// Render one report block.
pub fn report_lines(at: DateTime<Local>, connected: &[String]) -> Vec<String> {
    vec![
        format!("Relatório Periódico - {}", at.format("%Y-%m-%dT%H:%M:%S%.3f")),
        format!("Clientes Conectados: [{}]", connected.join(", ")),
        SEPARATOR.to_string(),
    ]
}

/// Append one report to the reports log and trace the command counters.
pub async fn write_report(matrix: &Matrix, registry: &Registry) -> Result<(), StoreError> {
    let connected = matrix.session_manager.connected_ids();
    let lines = report_lines(Local::now(), &connected);
    matrix.store.append_all(LogKind::Reports, &lines).await?;

    let commands: Vec<String> = registry
        .get_command_stats()
        .into_iter()
        .map(|(cmd, count)| format!("{cmd}={count}"))
        .collect();
    let pending = matrix.request_manager.list().await.len();
    info!(
        connected = connected.len(),
        channels = matrix.channel_manager.len(),
        pending_requests = pending,
        commands = %commands.join(" "),
        "Periodic report written"
    );
    Ok(())
}

/// Spawn the report loop. The first report is written immediately.
/// Returns `None` when `interval_secs` is 0.
pub fn spawn_report_task(
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
    interval_secs: u64,
) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("Periodic report disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;
            if let Err(e) = write_report(&matrix, &registry)
                .instrument(spans::report())
                .await
            {
                warn!(error = %e, "Failed to write periodic report");
            }
        }
    }))
}
