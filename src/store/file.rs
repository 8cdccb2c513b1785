//! File-backed log store.
//!
//! Each [`LogKind`] maps to one text file under the data directory. Writers
//! to the same file are serialized by a per-log lock so concurrent appends
//! never interleave within a line.

use super::{LogKind, LogStore, StoreError, check_single_line};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct FileStore {
    dir: PathBuf,
    locks: [Mutex<()>; 6],
}

impl FileStore {
    /// Open (and create if needed) the data directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|source| StoreError::Io {
            kind: LogKind::Users,
            source,
        })?;
        Ok(Self {
            dir,
            locks: Default::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, kind: LogKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    async fn write_lines(&self, kind: LogKind, buf: String) -> Result<(), StoreError> {
        let io = |source| StoreError::Io { kind, source };
        let _guard = self.locks[kind.index()].lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(kind))
            .await
            .map_err(io)?;
        file.write_all(buf.as_bytes()).await.map_err(io)?;
        file.flush().await.map_err(io)?;
        Ok(())
    }
}

#[async_trait]
impl LogStore for FileStore {
    async fn append(&self, kind: LogKind, line: &str) -> Result<(), StoreError> {
        check_single_line(line)?;
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.write_lines(kind, buf).await
    }

    async fn append_all(&self, kind: LogKind, lines: &[String]) -> Result<(), StoreError> {
        let mut buf = String::new();
        for line in lines {
            check_single_line(line)?;
            buf.push_str(line);
            buf.push('\n');
        }
        self.write_lines(kind, buf).await
    }

    async fn read_all(&self, kind: LogKind) -> Result<Vec<String>, StoreError> {
        let _guard = self.locks[kind.index()].lock().await;
        match fs::read_to_string(self.path(kind)).await {
            Ok(content) => Ok(content
                .lines()
                .map(|l| l.trim_end_matches('\r'))
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(StoreError::Io { kind, source }),
        }
    }
}
