//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Root config struct, loading and the small sections (server, report, logging)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`storage`]: Log storage backend selection (StorageConfig)
//! - [`limits`]: Per-connection limits and timeouts (LimitsConfig)
//! - [`security`]: Password hashing and account creation policy (SecurityConfig)

mod limits;
mod listen;
mod security;
mod storage;
mod types;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use security::SecurityConfig;
pub use storage::{StorageBackend, StorageConfig};
pub use types::{Config, ConfigError, LogFormat, LoggingConfig, ReportConfig, ServerConfig};
