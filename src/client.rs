//! Interactive terminal client.
//!
//! Connects to a server, asks for the user id and password, then relays
//! input lines to the server and server lines to the output until either
//! side closes. Server lines are relayed as soon as they arrive, including
//! deliveries that show up while the user is typing.

use emcom_proto::{LineCodec, ProtocolError};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info};

/// Address used when none is given on the command line.
pub const DEFAULT_SERVER: &str = "127.0.0.1:12345";

pub const ID_PROMPT: &str = "Por favor, insira seu nome de utilizador:";
pub const PASSWORD_PROMPT: &str = "Insira sua senha para autenticacao:";
pub const HELP_HINT: &str = "Digite 'ajuda' para ver os comandos disponiveis.";
pub const DISCONNECTED: &str = "Desconectado do servidor.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Which local prompt the next input line answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Id,
    Password,
    Commands,
}

/// Run one session against `server`, reading user lines from `input` and
/// writing prompts and server lines to `output`.
///
/// End of input closes the write side of the connection; the session ends
/// once the server closes its side.
pub async fn run<I, O>(server: &str, input: I, output: O) -> Result<(), ClientError>
where
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let stream = TcpStream::connect(server)
        .await
        .map_err(|source| ClientError::Connect {
            addr: server.to_string(),
            source,
        })?;
    info!(server = %server, "Connected");

    let (rd, wr) = stream.into_split();
    let mut from_server = FramedRead::new(rd, LineCodec::new());
    let mut to_server = FramedWrite::new(wr, LineCodec::new());
    let mut input = FramedRead::new(input, LineCodec::new());
    let mut output = FramedWrite::new(output, LineCodec::new());

    output.send(ID_PROMPT.to_string()).await?;
    let mut stage = Stage::Id;
    let mut input_open = true;

    loop {
        tokio::select! {
            line = from_server.next() => match line {
                Some(Ok(line)) => output.send(line).await?,
                Some(Err(e)) => return Err(e.into()),
                None => {
                    output.send(DISCONNECTED.to_string()).await?;
                    debug!("Server closed the connection");
                    return Ok(());
                }
            },
            line = input.next(), if input_open => match line {
                Some(Ok(line)) => {
                    to_server.send(line).await?;
                    stage = match stage {
                        Stage::Id => {
                            output.send(PASSWORD_PROMPT.to_string()).await?;
                            Stage::Password
                        }
                        Stage::Password => {
                            output.send(HELP_HINT.to_string()).await?;
                            Stage::Commands
                        }
                        Stage::Commands => Stage::Commands,
                    };
                }
                Some(Err(e)) => return Err(e.into()),
                None => {
                    debug!("Input closed");
                    input_open = false;
                    to_server.close().await?;
                }
            },
        }
    }
}
