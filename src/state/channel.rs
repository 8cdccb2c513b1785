//! A named group of clients.

use crate::state::managers::session::SessionManager;
use emcom_proto::Reply;
use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::warn;

/// A channel and its current members.
///
/// Membership changes are idempotent set operations; the caller keeps the
/// membership log in step.
#[derive(Debug)]
pub struct Channel {
    id: String,
    members: RwLock<HashSet<String>>,
}

impl Channel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: RwLock::new(HashSet::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns `false` if `client` was already a member.
    pub fn add_member(&self, client: &str) -> bool {
        self.members.write().insert(client.to_string())
    }

    /// Returns `false` if `client` was not a member.
    pub fn remove_member(&self, client: &str) -> bool {
        self.members.write().remove(client)
    }

    pub fn is_member(&self, client: &str) -> bool {
        self.members.read().contains(client)
    }

    /// Current members, sorted.
    pub fn members(&self) -> Vec<String> {
        let mut members: Vec<String> = self.members.read().iter().cloned().collect();
        members.sort();
        members
    }

    /// Deliver `text` to every member with a live session except `sender`.
    ///
    /// Membership is snapshotted before delivery starts, so a member joining
    /// mid-broadcast is not reached and no member is reached twice. Returns
    /// the number of successful deliveries.
    pub fn broadcast(&self, sender: &str, text: &str, sessions: &SessionManager) -> usize {
        let snapshot: Vec<String> = self
            .members
            .read()
            .iter()
            .filter(|m| m.as_str() != sender)
            .cloned()
            .collect();

        let mut delivered = 0;
        for member in snapshot {
            let Some(session) = sessions.get(&member) else {
                continue;
            };
            let reply = Reply::ChannelReceived {
                channel: self.id.clone(),
                from: sender.to_string(),
                text: text.to_string(),
            };
            match session.deliver(reply) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(channel = %self.id, client_id = %member, error = %e, "Channel delivery failed")
                }
            }
        }
        delivered
    }
}
