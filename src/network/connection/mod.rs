//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task:
//!
//! ```text
//! Connecting ── id line ──▶ Authenticating ── password ──▶ Authenticated ──▶ Closed
//!                              │ bad secret / duplicate           │ sair, EOF, I/O error
//!                              └──────────────▶ Closed ◀──────────┘
//! ```
//!
//! While authenticated the task `select!`s between the client's next line
//! and the session's outgoing queue, so replies and deliveries from other
//! sessions share one ordered writer.

mod event_loop;
mod handshake;

use crate::handlers::Registry;
use crate::state::{Matrix, SessionId};
use emcom_proto::{LineCodec, ProtocolError, Reply};
use futures_util::SinkExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{info, instrument};

/// A client connection handler.
pub struct Connection {
    session_id: SessionId,
    addr: SocketAddr,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
    reader: FramedRead<OwnedReadHalf, LineCodec>,
    writer: FramedWrite<OwnedWriteHalf, LineCodec>,
}

impl Connection {
    pub fn new(
        session_id: SessionId,
        stream: TcpStream,
        addr: SocketAddr,
        matrix: Arc<Matrix>,
        registry: Arc<Registry>,
    ) -> Self {
        let max_line = matrix.config.limits.max_line_length;
        let (read_half, write_half) = stream.into_split();
        Self {
            session_id,
            addr,
            matrix,
            registry,
            reader: FramedRead::new(read_half, LineCodec::with_max_len(max_line)),
            writer: FramedWrite::new(write_half, LineCodec::new()),
        }
    }

    /// Run the connection until the client leaves or the stream fails.
    #[instrument(skip(self), fields(session = %self.session_id, addr = %self.addr), name = "connection")]
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(server = %self.matrix.config.server_name, "Client connected");

        let Some(authenticated) = self.handshake().await? else {
            return Ok(());
        };
        self.event_loop(authenticated).await
    }

    /// Write one reply line.
    async fn send(&mut self, reply: &Reply) -> Result<(), ProtocolError> {
        self.writer.send(reply.to_string()).await
    }
}
