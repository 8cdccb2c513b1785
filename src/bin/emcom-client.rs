//! emcom-client - interactive terminal client for emcomd.
//!
//! Usage: `emcom-client [address]` (default `127.0.0.1:12345`).

use emcomd::client::{self, DEFAULT_SERVER};
use emcomd::telemetry::init_client_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_client_tracing();

    let server = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    if let Err(e) = client::run(&server, tokio::io::stdin(), tokio::io::stdout()).await {
        eprintln!("emcom-client: {e}");
        return Err(e.into());
    }
    Ok(())
}
