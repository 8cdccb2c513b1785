//! # emcom-proto
//!
//! Wire grammar for the emcomd emergency messaging server.
//!
//! The protocol is line oriented: every client line is one command, every
//! server line is one reply. Commands are colon delimited
//! (`mensagem:<id>:<texto>`) and replies are plain Portuguese text.
//!
//! ## Quick Start
//!
//! ```rust
//! use emcom_proto::{Command, Reply};
//!
//! let cmd = Command::parse("mensagem:bob:olá").expect("valid command");
//! assert_eq!(
//!     cmd,
//!     Command::DirectMessage { target: "bob".into(), text: "olá".into() }
//! );
//!
//! let reply = Reply::ChannelJoined("geral".into());
//! assert_eq!(reply.to_string(), "Você entrou no canal geral");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod line;
pub mod operation;
pub mod response;

pub use command::{Command, Usage, is_valid_id};
pub use error::{CommandParseError, ProtocolError};
pub use line::LineCodec;
pub use operation::{OperationType, RoleLevel};
pub use response::{HELP_LINES, Reply};
