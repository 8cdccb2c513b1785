//! Authenticated state: dispatch client lines, forward deliveries.

use super::Connection;
use super::handshake::Authenticated;
use crate::error::HandlerError;
use crate::handlers::{Context, SessionState};
use crate::state::{Matrix, SessionId};
use emcom_proto::{ProtocolError, Reply};
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

/// Removes the session from the directory when the connection ends, however
/// it ends.
struct SessionGuard {
    matrix: Arc<Matrix>,
    client_id: String,
    session_id: SessionId,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self
            .matrix
            .session_manager
            .unregister(&self.client_id, self.session_id)
        {
            info!(client_id = %self.client_id, "Session closed");
        }
    }
}

impl Connection {
    pub(super) async fn event_loop(&mut self, auth: Authenticated) -> anyhow::Result<()> {
        let Authenticated {
            client_id,
            mut outgoing,
        } = auth;
        let _guard = SessionGuard {
            matrix: Arc::clone(&self.matrix),
            client_id: client_id.clone(),
            session_id: self.session_id,
        };

        self.send(&Reply::AuthOk(client_id.clone())).await?;
        self.send(&Reply::HelpHint).await?;

        let matrix = Arc::clone(&self.matrix);
        let registry = Arc::clone(&self.registry);
        let idle_timeout = matrix.config.limits.idle_timeout();
        let mut state = SessionState::default();

        // Only inbound lines push the idle deadline back; deliveries do not.
        let idle = sleep(idle_timeout.unwrap_or_default());
        tokio::pin!(idle);

        loop {
            tokio::select! {
                () = &mut idle, if idle_timeout.is_some() => {
                    info!(client_id = %client_id, "Idle timeout");
                    return Ok(());
                }
                inbound = self.reader.next() => {
                    let line = match inbound {
                        None => {
                            info!(client_id = %client_id, "Client disconnected");
                            return Ok(());
                        }
                        Some(Ok(line)) => line,
                        Some(Err(ProtocolError::LineTooLong { actual, limit })) => {
                            warn!(client_id = %client_id, actual, limit, "Line too long, closing");
                            self.send(&Reply::InputTooLong).await?;
                            return Ok(());
                        }
                        Some(Err(e)) => {
                            debug!(client_id = %client_id, error = %e, "Read failed");
                            return Err(e.into());
                        }
                    };
                    if let Some(limit) = idle_timeout {
                        idle.as_mut().reset(Instant::now() + limit);
                    }

                    let mut ctx =
                        Context::new(&client_id, self.session_id, &matrix, &mut state);
                    let result = registry.dispatch(&mut ctx, &line).await;
                    for reply in ctx.take_replies() {
                        self.send(&reply).await?;
                    }

                    match result {
                        Ok(()) => {}
                        Err(HandlerError::Quit) => {
                            info!(client_id = %client_id, "Client logged out");
                            return Ok(());
                        }
                        Err(HandlerError::Internal(msg)) => {
                            error!(client_id = %client_id, error = %msg, "Internal handler error");
                        }
                        Err(e) => {
                            if let HandlerError::StorageIOFailure(ref source) = e {
                                warn!(client_id = %client_id, error = %source, "Storage failure");
                            }
                            if let Some(reply) = e.to_reply() {
                                self.send(&reply).await?;
                            }
                        }
                    }
                }
                Some(reply) = outgoing.recv() => {
                    self.send(&reply).await?;
                }
            }
        }
    }
}
