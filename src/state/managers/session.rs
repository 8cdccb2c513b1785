//! Session directory.
//!
//! Maps client ids to the outgoing queue of their live connection. Direct
//! messages, channel broadcasts and emergency fan-out all deliver through
//! here.

use crate::error::{DeliveryError, DirectoryError};
use crate::state::SessionId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use emcom_proto::Reply;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Handle to one live connection.
#[derive(Debug)]
pub struct SessionHandle {
    pub session_id: SessionId,
    pub client_id: String,
    tx: mpsc::Sender<Reply>,
}

impl SessionHandle {
    pub fn new(session_id: SessionId, client_id: &str, tx: mpsc::Sender<Reply>) -> Self {
        Self {
            session_id,
            client_id: client_id.to_string(),
            tx,
        }
    }

    /// Queue `reply` without waiting. A slow recipient never blocks the
    /// sender; a full queue drops the reply.
    pub fn deliver(&self, reply: Reply) -> Result<(), DeliveryError> {
        self.tx.try_send(reply).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::QueueFull(self.client_id.clone()),
            TrySendError::Closed(_) => DeliveryError::Closed(self.client_id.clone()),
        })
    }
}

/// Process-wide directory of live sessions.
pub struct SessionManager {
    sessions: DashMap<String, Arc<SessionHandle>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a session. Fails if the client already has a live one.
    pub fn register(&self, handle: Arc<SessionHandle>) -> Result<(), DirectoryError> {
        match self.sessions.entry(handle.client_id.clone()) {
            Entry::Occupied(_) => Err(DirectoryError::AlreadyConnected(handle.client_id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Remove the entry for `client_id` if it still belongs to `session_id`.
    /// Safe to call more than once.
    pub fn unregister(&self, client_id: &str, session_id: SessionId) -> bool {
        self.sessions
            .remove_if(client_id, |_, h| h.session_id == session_id)
            .is_some()
    }

    pub fn get(&self, client_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.get(client_id).map(|e| Arc::clone(e.value()))
    }

    pub fn is_connected(&self, client_id: &str) -> bool {
        self.sessions.contains_key(client_id)
    }

    /// Snapshot of every live session.
    pub fn all(&self) -> Vec<Arc<SessionHandle>> {
        self.sessions.iter().map(|e| Arc::clone(e.value())).collect()
    }

    /// Connected client ids, sorted.
    pub fn connected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
