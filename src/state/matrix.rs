//! The Matrix - Central shared state for the server.
//!
//! Built once at startup from the log store and shared as `Arc<Matrix>` with
//! the gateway, every connection task and the report task. There is no
//! ambient global state; everything a handler can touch is reached from here.

use crate::config::{Config, LimitsConfig, SecurityConfig};
use crate::state::SessionIdGenerator;
use crate::state::managers::channel::ChannelManager;
use crate::state::managers::credential::CredentialManager;
use crate::state::managers::request::RequestManager;
use crate::state::managers::session::SessionManager;
use crate::store::{LogKind, LogStore, MessageRecord, StoreError};
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration accessible to handlers via Matrix.
#[derive(Debug, Clone, Default)]
pub struct MatrixConfig {
    pub server_name: String,
    pub limits: LimitsConfig,
    pub security: SecurityConfig,
}

impl From<&Config> for MatrixConfig {
    fn from(config: &Config) -> Self {
        Self {
            server_name: config.server.name.clone(),
            limits: config.limits.clone(),
            security: config.security.clone(),
        }
    }
}

/// The Matrix - Central shared state container.
pub struct Matrix {
    /// Known users and their roles.
    pub credential_manager: CredentialManager,
    /// Channels and their members.
    pub channel_manager: ChannelManager,
    /// Live sessions, by client id.
    pub session_manager: SessionManager,
    /// Outstanding operation requests.
    pub request_manager: RequestManager,
    /// Session id generator for new connections.
    pub session_ids: SessionIdGenerator,
    /// Backing log store.
    pub store: Arc<dyn LogStore>,
    /// Server configuration (for handlers to access).
    pub config: MatrixConfig,
}

impl Matrix {
    /// Create an empty Matrix over `store` without replaying it.
    pub fn new(config: MatrixConfig, store: Arc<dyn LogStore>) -> Self {
        Self {
            credential_manager: CredentialManager::new(
                Arc::clone(&store),
                config.security.hash_new_passwords,
            ),
            channel_manager: ChannelManager::new(Arc::clone(&store)),
            session_manager: SessionManager::new(),
            request_manager: RequestManager::new(Arc::clone(&store)),
            session_ids: SessionIdGenerator::new(),
            store,
            config,
        }
    }

    /// Create a Matrix and rebuild users, channels, memberships and pending
    /// requests from `store`.
    pub async fn load(config: MatrixConfig, store: Arc<dyn LogStore>) -> Result<Self, StoreError> {
        let matrix = Self::new(config, store);
        let users = matrix.credential_manager.load().await?;
        let channels = matrix.channel_manager.load().await?;
        let requests = matrix.request_manager.load().await?;
        if users == 0 {
            warn!("No users loaded; nobody can authenticate until users.txt is populated");
        }
        info!(users, channels, requests, "State restored");
        Ok(matrix)
    }

    /// Append a message to the message log.
    pub async fn record_message(&self, record: &MessageRecord) -> Result<(), StoreError> {
        self.store
            .append(LogKind::Messages, &record.to_string())
            .await
    }

    /// Logged messages `client` may read: direct messages addressed to it
    /// and messages of channels it currently belongs to.
    pub async fn stored_messages_for(&self, client: &str) -> Result<Vec<String>, StoreError> {
        let channels = self.channel_manager.memberships_of(client).await?;
        let lines = self.store.read_all(LogKind::Messages).await?;
        Ok(lines
            .into_iter()
            .filter(|line| match line.parse::<MessageRecord>() {
                Ok(rec) => rec.visible_to(client, channels.iter()),
                Err(_) => false,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn load_rebuilds_every_manager() {
        let store = Arc::new(
            MemoryStore::new()
                .with_lines(LogKind::Users, ["alice:pw:todos"])
                .with_lines(LogKind::Channels, ["geral"])
                .with_lines(LogKind::Membership, ["alice entrou geral"])
                .with_lines(LogKind::Requests, ["alice:DRE:PENDING"]),
        );
        let matrix = Matrix::load(MatrixConfig::default(), store).await.unwrap();

        assert!(matrix.credential_manager.authenticate("alice", "pw"));
        assert!(matrix.channel_manager.get("geral").unwrap().is_member("alice"));
        assert_eq!(matrix.request_manager.list().await.len(), 1);
        assert_eq!(matrix.session_manager.len(), 0);
    }

    #[tokio::test]
    async fn stored_messages_filter_by_recipient_and_membership() {
        let store = Arc::new(
            MemoryStore::new()
                .with_lines(LogKind::Membership, ["bob entrou geral"])
                .with_lines(
                    LogKind::Messages,
                    [
                        "De: alice Para: bob Mensagem: oi",
                        "De: alice Para: bobby Mensagem: não é para ti",
                        "Canal: geral De: alice Mensagem: reunião",
                        "Canal: norte De: alice Mensagem: outro canal",
                    ],
                ),
        );
        let matrix = Matrix::load(MatrixConfig::default(), store).await.unwrap();

        assert_eq!(
            matrix.stored_messages_for("bob").await.unwrap(),
            vec![
                "De: alice Para: bob Mensagem: oi",
                "Canal: geral De: alice Mensagem: reunião"
            ]
        );
    }
}
