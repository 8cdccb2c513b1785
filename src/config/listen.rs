//! Network listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (default: "0.0.0.0:12345").
    #[serde(default = "default_address")]
    pub address: SocketAddr,
    /// Maximum concurrently running sessions (default: 10).
    /// Connections accepted beyond this wait for a free slot.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 12345))
}

fn default_max_sessions() -> usize {
    10
}
