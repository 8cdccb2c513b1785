//! Connecting and Authenticating states.

use super::Connection;
use crate::error::HandlerError;
use crate::state::SessionHandle;
use emcom_proto::{ProtocolError, Reply};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A client that proved its identity and now owns a directory entry.
pub(super) struct Authenticated {
    pub client_id: String,
    pub outgoing: mpsc::Receiver<Reply>,
}

impl Connection {
    /// Read the id line, prompt for and check the password, then register
    /// the session. `None` means the connection should simply close.
    pub(super) async fn handshake(&mut self) -> anyhow::Result<Option<Authenticated>> {
        let timeout = self.matrix.config.limits.handshake_timeout();

        let Some(client_id) = self.read_handshake_line(timeout).await? else {
            debug!("Disconnected before identifying");
            return Ok(None);
        };
        let client_id = client_id.trim().to_string();

        self.send(&Reply::Welcome).await?;
        self.send(&Reply::PasswordPrompt).await?;

        let Some(password) = self.read_handshake_line(timeout).await? else {
            debug!(client_id = %client_id, "Disconnected before password");
            return Ok(None);
        };

        if !self
            .matrix
            .credential_manager
            .authenticate(&client_id, &password)
        {
            warn!(
                client_id = %client_id,
                error_code = HandlerError::AuthenticationFailure.error_code(),
                "Authentication failed"
            );
            self.send(&Reply::AuthFailed).await?;
            return Ok(None);
        }

        let (tx, outgoing) = mpsc::channel(self.matrix.config.limits.outgoing_queue.max(1));
        let handle = Arc::new(SessionHandle::new(self.session_id, &client_id, tx));
        if let Err(e) = self.matrix.session_manager.register(handle) {
            warn!(client_id = %client_id, error = %e, "Login refused");
            self.send(&Reply::AlreadyConnected).await?;
            return Ok(None);
        }

        info!(client_id = %client_id, "Client authenticated");
        Ok(Some(Authenticated {
            client_id,
            outgoing,
        }))
    }

    /// Next line within `timeout`. `None` on EOF, timeout or an oversized
    /// line (after telling the client).
    async fn read_handshake_line(&mut self, timeout: Duration) -> anyhow::Result<Option<String>> {
        match tokio::time::timeout(timeout, self.reader.next()).await {
            Err(_) => {
                debug!("Handshake timed out");
                Ok(None)
            }
            Ok(None) => Ok(None),
            Ok(Some(Ok(line))) => Ok(Some(line)),
            Ok(Some(Err(ProtocolError::LineTooLong { actual, limit }))) => {
                warn!(actual, limit, "Handshake line too long");
                self.send(&Reply::InputTooLong).await?;
                Ok(None)
            }
            Ok(Some(Err(e))) => Err(e.into()),
        }
    }
}
