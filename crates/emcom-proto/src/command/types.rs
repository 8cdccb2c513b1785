//! Command and usage definitions.

use std::fmt;

/// A parsed client command.
///
/// Identifiers (`target`, `channel`, `id`) never contain `:` or whitespace;
/// free text keeps every character after the last delimiter, colons included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ajuda`
    Help,
    /// `sair`
    Logout,
    /// `mensagem:<id>:<texto>`
    DirectMessage {
        /// Recipient client id.
        target: String,
        /// Message body.
        text: String,
    },
    /// `canal:<canal>:<texto>`
    ChannelMessage {
        /// Destination channel id.
        channel: String,
        /// Message body.
        text: String,
    },
    /// `criar canal:<canal>`
    CreateChannel(String),
    /// `entrar canal:<canal>`
    JoinChannel(String),
    /// `sair canal:<canal>`
    LeaveChannel(String),
    /// `solicitar:<DRE|ACE|OEM>`, operation code kept raw so the handler can
    /// answer unknown codes with its own reply.
    Request(String),
    /// `aprovar`
    Approve,
    /// `ler mensagens`
    ReadMessages,
    /// `criar_user:<id>:<senha>:<perfil>`
    CreateUser {
        /// New client id.
        id: String,
        /// New secret.
        secret: String,
        /// Profile name as typed by the client.
        profile: String,
    },
    /// `mensagem emergencia:<texto>`
    Emergency(String),
}

impl Command {
    /// Stable upper-case name used for dispatch and usage counters.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "AJUDA",
            Self::Logout => "SAIR",
            Self::DirectMessage { .. } => "MENSAGEM",
            Self::ChannelMessage { .. } => "CANAL",
            Self::CreateChannel(_) => "CRIAR_CANAL",
            Self::JoinChannel(_) => "ENTRAR_CANAL",
            Self::LeaveChannel(_) => "SAIR_CANAL",
            Self::Request(_) => "SOLICITAR",
            Self::Approve => "APROVAR",
            Self::ReadMessages => "LER_MENSAGENS",
            Self::CreateUser { .. } => "CRIAR_USER",
            Self::Emergency(_) => "EMERGENCIA",
        }
    }
}

/// Argument format of a command, used to build the usage reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// `mensagem:<destinatário>:<mensagem>`
    DirectMessage,
    /// `canal:<canal_id>:<mensagem>`
    ChannelMessage,
    /// `criar canal:<canal_id>`
    CreateChannel,
    /// `entrar canal:<canal_id>`
    JoinChannel,
    /// `sair canal:<canal_id>`
    LeaveChannel,
    /// `solicitar:<tipo_operação>`
    Request,
    /// `criar_user:<nome_user>:<senha>:<perfil>`
    CreateUser,
    /// `mensagem emergencia:<mensagem>`
    Emergency,
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DirectMessage => "mensagem:<destinatário>:<mensagem>",
            Self::ChannelMessage => "canal:<canal_id>:<mensagem>",
            Self::CreateChannel => "criar canal:<canal_id>",
            Self::JoinChannel => "entrar canal:<canal_id>",
            Self::LeaveChannel => "sair canal:<canal_id>",
            Self::Request => "solicitar:<tipo_operação>",
            Self::CreateUser => "criar_user:<nome_user>:<senha>:<perfil>",
            Self::Emergency => "mensagem emergencia:<mensagem>",
        })
    }
}
