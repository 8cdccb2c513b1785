//! Unified error handling for emcomd.
//!
//! [`HandlerError`] is the taxonomy every command handler returns. Each
//! variant knows its log label ([`HandlerError::error_code`]) and the line,
//! if any, the originating client sees ([`HandlerError::to_reply`]). Nothing
//! here is ever surfaced to another session.

use crate::store::StoreError;
use emcom_proto::{OperationType, Reply, Usage};
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// What the caller lacked permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    Request(OperationType),
    Approve(OperationType),
    CreateUser,
    Emergency,
}

/// What could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    User(String),
    Channel(String),
    /// The caller has no role record.
    Role,
    /// The selected request was resolved after the menu was shown.
    PendingRequest(OperationType),
}

/// What already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existing {
    User(String),
    Channel(String),
}

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("authorization denied: {0:?}")]
    AuthorizationDenied(Denied),

    #[error("not found: {0:?}")]
    NotFound(Missing),

    #[error("invalid format: {0}")]
    InvalidFormat(Usage),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid operation type: {0}")]
    InvalidOperation(String),

    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("already exists: {0:?}")]
    AlreadyExists(Existing),

    #[error("already a member of {0}")]
    DuplicateMembership(String),

    #[error("not a member of {0}")]
    NotMember(String),

    #[error("must join {0} before sending")]
    MustJoinFirst(String),

    #[error("storage failure: {0}")]
    StorageIOFailure(#[from] StoreError),

    #[error("client quit")]
    Quit,

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailure => "authentication_failure",
            Self::AuthorizationDenied(_) => "authorization_denied",
            Self::NotFound(_) => "not_found",
            Self::InvalidFormat(_) => "invalid_format",
            Self::UnknownCommand(_) => "unknown_command",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::InvalidProfile(_) => "invalid_profile",
            Self::AlreadyExists(_) => "already_exists",
            Self::DuplicateMembership(_) => "duplicate_membership",
            Self::NotMember(_) => "not_member",
            Self::MustJoinFirst(_) => "must_join_first",
            Self::StorageIOFailure(_) => "storage_io_failure",
            Self::Quit => "quit",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Convert to the reply shown to the originating client.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply
    /// (quit, internal errors).
    pub fn to_reply(&self) -> Option<Reply> {
        let reply = match self {
            Self::AuthenticationFailure => Reply::AuthFailed,
            Self::AuthorizationDenied(denied) => match *denied {
                Denied::Request(op) => Reply::RequestDenied(op),
                Denied::Approve(op) => Reply::ApprovalDenied(op),
                Denied::CreateUser => Reply::UserCreationDenied,
                Denied::Emergency => Reply::EmergencyDenied,
            },
            Self::NotFound(missing) => match missing {
                Missing::User(id) => Reply::UserNotFound(id.clone()),
                Missing::Channel(id) => Reply::ChannelNotFound(id.clone()),
                Missing::Role => Reply::RoleNotFound,
                Missing::PendingRequest(op) => Reply::RequestAlreadyResolved(*op),
            },
            Self::InvalidFormat(usage) => Reply::Usage(*usage),
            Self::UnknownCommand(_) => Reply::Unknown,
            Self::InvalidOperation(_) => Reply::InvalidOperation,
            Self::InvalidProfile(_) => Reply::InvalidProfile,
            Self::AlreadyExists(existing) => match existing {
                Existing::User(_) => Reply::UserExists,
                Existing::Channel(id) => Reply::ChannelExists(id.clone()),
            },
            Self::DuplicateMembership(id) => Reply::AlreadyInChannel(id.clone()),
            Self::NotMember(id) => Reply::NotInChannel(id.clone()),
            Self::MustJoinFirst(id) => Reply::MustJoinFirst(id.clone()),
            Self::StorageIOFailure(_) => Reply::StorageFailure,

            // These errors don't get client-visible replies
            Self::Quit => return None,
            Self::Internal(_) => return None,
        };
        Some(reply)
    }
}

impl From<emcom_proto::CommandParseError> for HandlerError {
    fn from(err: emcom_proto::CommandParseError) -> Self {
        match err {
            emcom_proto::CommandParseError::Unrecognized(line) => Self::UnknownCommand(line),
            emcom_proto::CommandParseError::Usage(usage) => Self::InvalidFormat(usage),
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Session directory and delivery errors
// ============================================================================

/// Session directory registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("client {0} already has a live session")]
    AlreadyConnected(String),
}

/// Per-recipient delivery failures. Logged, never propagated to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("outgoing queue of {0} is full")]
    QueueFull(String),
    #[error("session of {0} is closed")]
    Closed(String),
}
