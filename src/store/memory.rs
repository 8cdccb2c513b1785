//! In-memory log store.
//!
//! Used by tests and by `backend = "memory"` deployments. Nothing survives
//! a restart.

use super::{LogKind, LogStore, StoreError, check_single_line};
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    logs: [Mutex<Vec<String>>; 6],
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a log before the server starts.
    pub fn with_lines<I, S>(self, kind: LogKind, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.logs[kind.index()]
            .lock()
            .extend(lines.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn append(&self, kind: LogKind, line: &str) -> Result<(), StoreError> {
        check_single_line(line)?;
        self.logs[kind.index()].lock().push(line.to_string());
        Ok(())
    }

    async fn append_all(&self, kind: LogKind, lines: &[String]) -> Result<(), StoreError> {
        for line in lines {
            check_single_line(line)?;
        }
        self.logs[kind.index()].lock().extend_from_slice(lines);
        Ok(())
    }

    async fn read_all(&self, kind: LogKind) -> Result<Vec<String>, StoreError> {
        Ok(self.logs[kind.index()].lock().clone())
    }
}
