//! Per-connection limits configuration.

use serde::Deserialize;
use std::time::Duration;

/// Per-connection limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted input line in bytes (default: 4096).
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Capacity of each session's outgoing queue (default: 256).
    /// Deliveries to a full queue are dropped and logged.
    #[serde(default = "default_outgoing_queue")]
    pub outgoing_queue: usize,
    /// Seconds allowed for the id and password lines (default: 30).
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout_secs: u64,
    /// Seconds without input before an authenticated session is closed
    /// (default: 0, disabled).
    #[serde(default)]
    pub idle_timeout_secs: u64,
}

impl LimitsConfig {
    /// Handshake timeout as a [`Duration`].
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    /// Idle timeout, `None` when disabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            outgoing_queue: default_outgoing_queue(),
            handshake_timeout_secs: default_handshake_timeout(),
            idle_timeout_secs: 0,
        }
    }
}

fn default_max_line_length() -> usize {
    4096
}

fn default_outgoing_queue() -> usize {
    256
}

fn default_handshake_timeout() -> u64 {
    30
}
