//! Error types for the emcom protocol library.
//!
//! [`ProtocolError`] covers transport-level failures raised by the
//! [`LineCodec`](crate::LineCodec); [`CommandParseError`] covers lines that
//! arrived intact but do not match the command grammar.

use crate::command::Usage;
use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Bytes buffered when the limit was hit.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },
}

/// Errors encountered when turning a line into a [`Command`](crate::Command).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    /// The line does not start with any known command keyword.
    #[error("unrecognized command: {0}")]
    Unrecognized(String),

    /// The keyword is known but the arguments do not fit its format.
    #[error("invalid format, usage: {0}")]
    Usage(Usage),
}
