//! Pending request queue.
//!
//! Requests are kept in insertion order. `add`, `list` and `resolve` run
//! under one queue-wide lock that is held across the log append, so the
//! request log and the in-memory queue always agree on order and no request
//! can be both resolved and still listed.

use crate::store::{LogKind, LogStore, RequestRecord, StoreError};
use emcom_proto::OperationType;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// An outstanding operation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub client: String,
    pub operation: OperationType,
}

impl PendingRequest {
    fn matches(&self, client: &str, operation: OperationType) -> bool {
        self.client == client && self.operation == operation
    }
}

pub struct RequestManager {
    pending: Mutex<VecDeque<PendingRequest>>,
    store: Arc<dyn LogStore>,
}

impl RequestManager {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            store,
        }
    }

    /// Replay the request log: each approval clears every pending record of
    /// the same pair written before it.
    pub async fn load(&self) -> Result<usize, StoreError> {
        let mut pending = self.pending.lock().await;
        pending.clear();
        for line in self.store.read_all(LogKind::Requests).await? {
            match line.parse::<RequestRecord>() {
                Ok(RequestRecord::Pending { client, operation }) => {
                    pending.push_back(PendingRequest { client, operation });
                }
                Ok(RequestRecord::Approved {
                    client, operation, ..
                }) => pending.retain(|r| !r.matches(&client, operation)),
                Err(e) => warn!(error = %e, "Skipping request record"),
            }
        }
        info!(count = pending.len(), "Loaded pending requests");
        Ok(pending.len())
    }

    /// Queue a request. Identical requests are kept as separate entries.
    pub async fn add(&self, client: &str, operation: OperationType) -> Result<(), StoreError> {
        let mut pending = self.pending.lock().await;
        let record = RequestRecord::Pending {
            client: client.to_string(),
            operation,
        };
        self.store
            .append(LogKind::Requests, &record.to_string())
            .await?;
        pending.push_back(PendingRequest {
            client: client.to_string(),
            operation,
        });
        Ok(())
    }

    /// Pending requests, oldest first.
    pub async fn list(&self) -> Vec<PendingRequest> {
        self.pending.lock().await.iter().cloned().collect()
    }

    /// Remove every pending request of `(client, operation)` and record the
    /// approval. Returns how many were removed; 0 means someone else resolved
    /// them first and nothing is written.
    pub async fn resolve(
        &self,
        client: &str,
        operation: OperationType,
        approver: &str,
    ) -> Result<usize, StoreError> {
        let mut pending = self.pending.lock().await;
        let matching = pending.iter().filter(|r| r.matches(client, operation)).count();
        if matching == 0 {
            return Ok(0);
        }

        let record = RequestRecord::Approved {
            client: client.to_string(),
            operation,
            approver: approver.to_string(),
        };
        self.store
            .append(LogKind::Requests, &record.to_string())
            .await?;
        pending.retain(|r| !r.matches(client, operation));

        info!(
            client_id = %client,
            op = %operation,
            approver = %approver,
            removed = matching,
            "Request approved"
        );
        Ok(matching)
    }
}
