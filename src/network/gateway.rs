//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listen socket and spawns a Connection task for each
//! incoming client. At most `max_sessions` connections run at once; further
//! clients wait in the accept backlog until a slot frees up.

use crate::handlers::Registry;
use crate::network::Connection;
use crate::state::Matrix;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
    slots: Arc<Semaphore>,
}

impl Gateway {
    /// Bind the gateway to `addr`.
    pub async fn bind(
        addr: SocketAddr,
        max_sessions: usize,
        matrix: Arc<Matrix>,
        registry: Arc<Registry>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, max_sessions, "Listener bound");

        Ok(Self {
            listener,
            matrix,
            registry,
            slots: Arc::new(Semaphore::new(max_sessions.max(1))),
        })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections until `shutdown` resolves.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let permit = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
                permit = Arc::clone(&self.slots).acquire_owned() => permit?,
            };

            let (stream, addr) = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                        continue;
                    }
                },
            };

            let session_id = self.matrix.session_ids.next();
            info!(%addr, session = %session_id, "Connection accepted");

            let connection = Connection::new(
                session_id,
                stream,
                addr,
                Arc::clone(&self.matrix),
                Arc::clone(&self.registry),
            );
            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = connection.run().await {
                    error!(session = %session_id, %addr, error = %e, "Connection error");
                }
                info!(session = %session_id, %addr, "Connection closed");
            });
        }
    }
}
