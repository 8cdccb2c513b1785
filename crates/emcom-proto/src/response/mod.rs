//! Server replies.
//!
//! Every line the server writes to a client is a [`Reply`]. The `Display`
//! impl is the wire text; a reply never contains a newline except
//! [`Reply::Help`], which renders [`HELP_LINES`] one per line.

use std::fmt;

use crate::command::Usage;
use crate::operation::{OperationType, RoleLevel};

/// Command list sent in response to `ajuda`.
pub const HELP_LINES: &[&str] = &[
    "Comandos disponíveis:",
    "1. mensagem:<destinatário>:<mensagem> - Enviar mensagem direta",
    "2. canal:<canal_id>:<mensagem> - Enviar mensagem para um canal",
    "3. criar canal:<canal_id> - Criar um novo canal",
    "4. entrar canal:<canal_id> - Entrar num canal",
    "5. sair canal:<canal_id> - Sair de um canal",
    "6. solicitar:<DRE|ACE|OEM> - Solicitar uma operação",
    "7. aprovar - Listar e aprovar solicitações pendentes",
    "8. ler mensagens - Ler mensagens guardadas",
    "9. criar_user:<nome_user>:<senha>:<perfil> - Criar utilizador",
    "10. mensagem emergencia:<mensagem> - Enviar mensagem de emergência",
    "0. sair - Terminar sessão",
];

/// A single server-to-client reply.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Reply {
    // ========================================================================
    // Session
    // ========================================================================
    /// Banner sent after the client id line.
    Welcome,
    /// Prompt for the password line.
    PasswordPrompt,
    /// Authentication rejected; the connection closes.
    AuthFailed,
    /// A live session already exists for this client id.
    AlreadyConnected,
    /// Authentication accepted.
    AuthOk(String),
    /// Follows [`Reply::AuthOk`].
    HelpHint,
    /// Sent before the server closes the session on `sair`.
    Disconnecting,
    /// Command list.
    Help,
    /// Line does not match any command.
    Unknown,
    /// Known command, wrong arguments.
    Usage(Usage),
    /// Input line exceeded the configured limit.
    InputTooLong,
    /// Persisting failed; the operation was not applied.
    StorageFailure,

    // ========================================================================
    // Deliveries
    // ========================================================================
    /// Direct message pushed to the recipient.
    DirectReceived {
        /// Sender id.
        from: String,
        /// Message body.
        text: String,
    },
    /// Channel message pushed to a member.
    ChannelReceived {
        /// Channel id.
        channel: String,
        /// Sender id.
        from: String,
        /// Message body.
        text: String,
    },
    /// Emergency broadcast pushed to every live session.
    EmergencyReceived {
        /// Sender id.
        from: String,
        /// Message body.
        text: String,
    },

    // ========================================================================
    // Messaging
    // ========================================================================
    /// Direct message delivered.
    MessageSent(String),
    /// Direct message stored for an offline recipient.
    RecipientOffline(String),
    /// Unknown client id.
    UserNotFound(String),
    /// Nothing in the log addressed to the caller.
    NoStoredMessages,
    /// One stored message line, verbatim.
    StoredMessage(String),

    // ========================================================================
    // Channels
    // ========================================================================
    /// Channel created.
    ChannelCreated(String),
    /// Channel id taken.
    ChannelExists(String),
    /// Joined.
    ChannelJoined(String),
    /// Left.
    ChannelLeft(String),
    /// Join on a channel the caller is already in.
    AlreadyInChannel(String),
    /// Leave on a channel the caller is not in.
    NotInChannel(String),
    /// Unknown channel id.
    ChannelNotFound(String),
    /// Channel message from a non-member.
    MustJoinFirst(String),
    /// Channel message accepted.
    ChannelMessageSent(String),

    // ========================================================================
    // Requests
    // ========================================================================
    /// Caller has no recorded role.
    RoleNotFound,
    /// Operation code is not DRE, ACE or OEM.
    InvalidOperation,
    /// Request queued.
    RequestRegistered(OperationType),
    /// Role too low to request.
    RequestDenied(OperationType),
    /// Approval menu with nothing to show.
    NoPendingRequests,
    /// Approval menu heading.
    PendingHeader,
    /// Approval menu line; `index` is 1-based.
    PendingEntry {
        /// Position in the menu.
        index: usize,
        /// Requesting client.
        client: String,
        /// Requested operation.
        operation: OperationType,
    },
    /// Approval menu footer.
    SelectionPrompt,
    /// `cancelar` at the approval menu.
    SelectionCancelled,
    /// Number outside the menu.
    InvalidChoice,
    /// Selection that is not a number.
    SelectionNotNumber,
    /// Request approved and removed.
    RequestApproved(OperationType),
    /// Role too low to approve.
    ApprovalDenied(OperationType),
    /// Request resolved by someone else since the menu was shown.
    RequestAlreadyResolved(OperationType),

    // ========================================================================
    // Accounts and emergency
    // ========================================================================
    /// Profile name not recognised.
    InvalidProfile,
    /// User created.
    UserCreated {
        /// New client id.
        id: String,
        /// Assigned role.
        role: RoleLevel,
    },
    /// Client id taken.
    UserExists,
    /// Caller may not create users.
    UserCreationDenied,
    /// Caller may not broadcast emergencies.
    EmergencyDenied,
    /// Emergency broadcast done.
    EmergencySent,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome => f.write_str("=== Bem-vindo ao Sistema de Emergência ==="),
            Self::PasswordPrompt => f.write_str("Por favor, insira a sua senha:"),
            Self::AuthFailed => f.write_str("Autenticação falhou. Conexão encerrada."),
            Self::AlreadyConnected => {
                f.write_str("Sessão já ativa para este utilizador. Conexão encerrada.")
            }
            Self::AuthOk(id) => write!(f, "Autenticação bem-sucedida! Bem-vindo, {id}!"),
            Self::HelpHint => f.write_str("Digite 'ajuda' para ver os comandos disponíveis."),
            Self::Disconnecting => f.write_str("Desconectando..."),
            Self::Help => f.write_str(&HELP_LINES.join("\n")),
            Self::Unknown => f.write_str(
                "Comando não reconhecido. Digite 'ajuda' para ver os comandos disponíveis.",
            ),
            Self::Usage(usage) => write!(f, "Formato inválido. Use: {usage}"),
            Self::InputTooLong => f.write_str("Linha demasiado longa."),
            Self::StorageFailure => f.write_str(
                "Erro ao processar o comando: falha no armazenamento. Tente novamente.",
            ),

            Self::DirectReceived { from, text } => {
                write!(f, "Mensagem recebida de {from}: {text}")
            }
            Self::ChannelReceived {
                channel,
                from,
                text,
            } => write!(f, "Mensagem recebida de {from} (canal {channel}): {text}"),
            Self::EmergencyReceived { from, text } => {
                write!(f, "[EMERGÊNCIA] Mensagem de {from}: {text}")
            }

            Self::MessageSent(to) => write!(f, "Mensagem enviada para {to}."),
            Self::RecipientOffline(to) => write!(
                f,
                "{to} não está conectado. A mensagem foi guardada e poderá ser lida com 'ler mensagens'."
            ),
            Self::UserNotFound(id) => write!(f, "Utilizador {id} não encontrado."),
            Self::NoStoredMessages => f.write_str("Nenhuma mensagem encontrada."),
            Self::StoredMessage(line) => f.write_str(line),

            Self::ChannelCreated(id) => write!(f, "Canal {id} criado com sucesso!"),
            Self::ChannelExists(id) => write!(f, "Canal {id} já existe."),
            Self::ChannelJoined(id) => write!(f, "Você entrou no canal {id}"),
            Self::ChannelLeft(id) => write!(f, "Você saiu do canal {id}"),
            Self::AlreadyInChannel(id) => write!(f, "Você já está no canal {id}"),
            Self::NotInChannel(id) => write!(f, "Você não está no canal {id}"),
            Self::ChannelNotFound(id) => write!(f, "Canal {id} não encontrado."),
            Self::MustJoinFirst(id) => write!(
                f,
                "Você precisa entrar no canal {id} antes de enviar mensagens."
            ),
            Self::ChannelMessageSent(id) => write!(f, "Mensagem enviada para o canal {id}."),

            Self::RoleNotFound => f.write_str("Erro: Cargo do utilizador não encontrado."),
            Self::InvalidOperation => f.write_str("Tipo de operação inválido."),
            Self::RequestRegistered(op) => write!(
                f,
                "Sua solicitação de {op} foi registrada e está aguardando aprovação."
            ),
            Self::RequestDenied(op) => {
                write!(f, "Você não possui permissão para solicitar {op}.")
            }
            Self::NoPendingRequests => f.write_str("Nenhuma solicitação pendente no momento."),
            Self::PendingHeader => f.write_str("Solicitações pendentes:"),
            Self::PendingEntry {
                index,
                client,
                operation,
            } => write!(f, "{index}. Cliente: {client} | Tipo: {operation}"),
            Self::SelectionPrompt => f.write_str(
                "Digite o número da solicitação para aprovar ou 'cancelar' para voltar ao menu.",
            ),
            Self::SelectionCancelled => f.write_str("Retornando ao menu principal."),
            Self::InvalidChoice => f.write_str("Escolha inválida."),
            Self::SelectionNotNumber => {
                f.write_str("Erro ao processar o comando. Tente novamente.")
            }
            Self::RequestApproved(op) => write!(f, "Solicitação de {op} aprovada!"),
            Self::ApprovalDenied(op) => write!(
                f,
                "Você não possui permissão para aprovar a solicitação de {op}."
            ),
            Self::RequestAlreadyResolved(op) => {
                write!(f, "A solicitação de {op} já não está pendente.")
            }

            Self::InvalidProfile => f.write_str(
                "Perfil inválido. Use: 'todos', 'Coordenador Regional', 'Operador de Nivel Medio', ou 'Administrador'.",
            ),
            Self::UserCreated { id, role } => write!(
                f,
                "Utilizador {id} criado com sucesso com cargo: {}!",
                role.profile_name()
            ),
            Self::UserExists => f.write_str("Utilizador já existe."),
            Self::UserCreationDenied => {
                f.write_str("Você não tem permissão para criar utilizadores.")
            }
            Self::EmergencyDenied => {
                f.write_str("Você não tem permissão para enviar mensagens de emergência.")
            }
            Self::EmergencySent => f.write_str("Mensagem de emergência enviada com sucesso."),
        }
    }
}
