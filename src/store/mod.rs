//! Log storage abstraction.
//!
//! Everything the server persists is an append-only sequence of text lines.
//! Current state is rebuilt by replaying a whole log, so the only contract a
//! backend must honour is "append one line" and "read every line back in
//! append order".

use crate::config::{StorageBackend, StorageConfig};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub mod file;
pub mod memory;
pub mod records;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use records::{MembershipAction, MembershipEvent, MessageRecord, RequestRecord, UserRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {kind}: {source}")]
    Io {
        kind: LogKind,
        #[source]
        source: std::io::Error,
    },
    #[error("record contains a line break")]
    Multiline,
}

/// One of the logs the server keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// `<id>:<secret>:<profile>` per user.
    Users,
    /// One channel id per line.
    Channels,
    /// `<client> <entrou|saiu> <channel>`.
    Membership,
    /// Direct and channel message log.
    Messages,
    /// Pending requests and their resolutions.
    Requests,
    /// Periodic report blocks.
    Reports,
}

impl LogKind {
    /// File name used by [`FileStore`].
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Users => "users.txt",
            Self::Channels => "channels.txt",
            Self::Membership => "user_channel_membership.log",
            Self::Messages => "messages.log",
            Self::Requests => "approvals.log",
            Self::Reports => "periodic_reports.log",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Users => 0,
            Self::Channels => 1,
            Self::Membership => 2,
            Self::Messages => 3,
            Self::Requests => 4,
            Self::Reports => 5,
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append one line. `line` must not contain `\n`.
    async fn append(&self, kind: LogKind, line: &str) -> Result<(), StoreError>;

    /// Append several lines as one write.
    async fn append_all(&self, kind: LogKind, lines: &[String]) -> Result<(), StoreError> {
        for line in lines {
            self.append(kind, line).await?;
        }
        Ok(())
    }

    /// Every line of the log in append order. A log never written is empty.
    async fn read_all(&self, kind: LogKind) -> Result<Vec<String>, StoreError>;
}

/// Build the backend selected by `[storage]`.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn LogStore>, StoreError> {
    match config.backend {
        StorageBackend::File => {
            let store = FileStore::open(config.path.clone()).await?;
            info!(path = %store.dir().display(), "Using file store");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            info!("Using in-memory store; nothing will survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn check_single_line(line: &str) -> Result<(), StoreError> {
    if line.contains(['\n', '\r']) {
        Err(StoreError::Multiline)
    } else {
        Ok(())
    }
}
