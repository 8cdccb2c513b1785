//! emcomd - emergency communications daemon.
//!
//! A line-oriented TCP server where authenticated clients exchange direct
//! and channel messages, request and approve emergency operations, and
//! receive administrator emergency broadcasts. All state is kept in
//! append-only logs and rebuilt by replay at startup.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod report;
pub mod security;
pub mod state;
pub mod store;
pub mod telemetry;
