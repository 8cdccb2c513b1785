//! Channel registry.
//!
//! Owns every [`Channel`] and keeps them consistent with the channel list
//! and the membership log. A membership change is written to the log before
//! the in-memory set is touched, so a storage failure leaves both unchanged.

use crate::error::{Existing, HandlerError, Missing};
use crate::state::Channel;
use crate::store::{LogKind, LogStore, MembershipAction, MembershipEvent, StoreError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ChannelManager {
    channels: DashMap<String, Arc<Channel>>,
    store: Arc<dyn LogStore>,
}

impl ChannelManager {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            channels: DashMap::new(),
            store,
        }
    }

    /// Rebuild channels from the channel list, then replay the membership
    /// log into them.
    pub async fn load(&self) -> Result<usize, StoreError> {
        for id in self.store.read_all(LogKind::Channels).await? {
            let id = id.trim().to_string();
            if !id.is_empty() {
                self.channels
                    .entry(id.clone())
                    .or_insert_with(|| Arc::new(Channel::new(id)));
            }
        }

        for line in self.store.read_all(LogKind::Membership).await? {
            let event = match line.parse::<MembershipEvent>() {
                Ok(ev) => ev,
                Err(e) => {
                    warn!(error = %e, "Skipping membership record");
                    continue;
                }
            };
            let Some(channel) = self.get(&event.channel) else {
                debug!(channel = %event.channel, "Membership event for unknown channel");
                continue;
            };
            match event.action {
                MembershipAction::Joined => channel.add_member(&event.client),
                MembershipAction::Left => channel.remove_member(&event.client),
            };
        }

        info!(count = self.channels.len(), "Loaded channels");
        Ok(self.channels.len())
    }

    /// Create and persist a channel. Duplicate ids are rejected.
    pub async fn create(&self, id: &str) -> Result<Arc<Channel>, HandlerError> {
        let channel = match self.channels.entry(id.to_string()) {
            Entry::Occupied(_) => {
                return Err(HandlerError::AlreadyExists(Existing::Channel(id.to_string())));
            }
            Entry::Vacant(slot) => Arc::clone(slot.insert(Arc::new(Channel::new(id))).value()),
        };

        if let Err(e) = self.store.append(LogKind::Channels, id).await {
            self.channels.remove(id);
            return Err(e.into());
        }

        info!(channel = %id, "Channel created");
        Ok(channel)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Channel>> {
        self.channels.get(id).map(|c| Arc::clone(c.value()))
    }

    /// Snapshot of every channel.
    pub fn all(&self) -> Vec<Arc<Channel>> {
        self.channels.iter().map(|c| Arc::clone(c.value())).collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Channels `client` currently belongs to according to the membership
    /// log (last action per channel wins).
    pub async fn memberships_of(&self, client: &str) -> Result<HashSet<String>, StoreError> {
        let mut channels = HashSet::new();
        for line in self.store.read_all(LogKind::Membership).await? {
            let Ok(event) = line.parse::<MembershipEvent>() else {
                continue;
            };
            if event.client != client {
                continue;
            }
            match event.action {
                MembershipAction::Joined => channels.insert(event.channel),
                MembershipAction::Left => channels.remove(&event.channel),
            };
        }
        Ok(channels)
    }

    pub async fn join(&self, client: &str, id: &str) -> Result<(), HandlerError> {
        if self.memberships_of(client).await?.contains(id) {
            return Err(HandlerError::DuplicateMembership(id.to_string()));
        }
        let channel = self
            .get(id)
            .ok_or_else(|| HandlerError::NotFound(Missing::Channel(id.to_string())))?;

        self.store
            .append(LogKind::Membership, &MembershipEvent::joined(client, id).to_string())
            .await?;
        channel.add_member(client);
        debug!(client_id = %client, channel = %id, "Joined channel");
        Ok(())
    }

    pub async fn leave(&self, client: &str, id: &str) -> Result<(), HandlerError> {
        if !self.memberships_of(client).await?.contains(id) {
            return Err(HandlerError::NotMember(id.to_string()));
        }
        let channel = self
            .get(id)
            .ok_or_else(|| HandlerError::NotFound(Missing::Channel(id.to_string())))?;

        self.store
            .append(LogKind::Membership, &MembershipEvent::left(client, id).to_string())
            .await?;
        channel.remove_member(client);
        debug!(client_id = %client, channel = %id, "Left channel");
        Ok(())
    }
}
