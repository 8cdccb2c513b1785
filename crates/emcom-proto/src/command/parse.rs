//! Line to [`Command`] parsing.
//!
//! Keywords match ASCII case-insensitively; arguments are kept verbatim.
//! Prefixes are tested longest-first where they overlap
//! (`mensagem emergencia:` before `mensagem:`, `sair canal:` before `sair`).

use super::types::{Command, Usage};
use crate::error::CommandParseError;

/// Whether `id` can be used as a client or channel identifier.
///
/// Identifiers end up in colon- and space-delimited log lines, so neither
/// separator may appear inside one.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(|c| c == ':' || c.is_whitespace())
}

/// Strip `prefix` from `line` ignoring ASCII case.
fn strip_keyword<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        line.get(prefix.len()..)
    } else {
        None
    }
}

/// Free text is stored as one log line, so it may not carry a line break.
fn is_valid_text(text: &str) -> bool {
    !text.is_empty() && !text.contains(['\r', '\n'])
}

/// `<id>:<text>` with a valid id and non-empty text.
fn id_and_text(rest: &str, usage: Usage) -> Result<(String, String), CommandParseError> {
    match rest.split_once(':') {
        Some((id, text)) if is_valid_id(id) && is_valid_text(text) => {
            Ok((id.to_string(), text.to_string()))
        }
        _ => Err(CommandParseError::Usage(usage)),
    }
}

fn single_id(rest: &str, usage: Usage) -> Result<String, CommandParseError> {
    let id = rest.trim();
    if is_valid_id(id) {
        Ok(id.to_string())
    } else {
        Err(CommandParseError::Usage(usage))
    }
}

impl Command {
    /// Parse one client line.
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let bare = line.trim();

        for (keyword, cmd) in [
            ("ajuda", Command::Help),
            ("sair", Command::Logout),
            ("aprovar", Command::Approve),
            ("ler mensagens", Command::ReadMessages),
        ] {
            if bare.eq_ignore_ascii_case(keyword) {
                return Ok(cmd);
            }
        }

        if let Some(rest) = strip_keyword(line, "mensagem emergencia:") {
            if rest.trim().is_empty() || !is_valid_text(rest) {
                return Err(CommandParseError::Usage(Usage::Emergency));
            }
            return Ok(Command::Emergency(rest.to_string()));
        }

        if let Some(rest) = strip_keyword(line, "mensagem:") {
            let (target, text) = id_and_text(rest, Usage::DirectMessage)?;
            return Ok(Command::DirectMessage { target, text });
        }

        if let Some(rest) = strip_keyword(line, "criar canal:") {
            return single_id(rest, Usage::CreateChannel).map(Command::CreateChannel);
        }

        if let Some(rest) = strip_keyword(line, "entrar canal:") {
            return single_id(rest, Usage::JoinChannel).map(Command::JoinChannel);
        }

        if let Some(rest) = strip_keyword(line, "sair canal:") {
            return single_id(rest, Usage::LeaveChannel).map(Command::LeaveChannel);
        }

        if let Some(rest) = strip_keyword(line, "canal:") {
            let (channel, text) = id_and_text(rest, Usage::ChannelMessage)?;
            return Ok(Command::ChannelMessage { channel, text });
        }

        if let Some(rest) = strip_keyword(line, "solicitar:") {
            let op = rest.trim();
            if op.is_empty() {
                return Err(CommandParseError::Usage(Usage::Request));
            }
            return Ok(Command::Request(op.to_string()));
        }

        if let Some(rest) = strip_keyword(line, "criar_user:") {
            let mut parts = rest.splitn(3, ':');
            return match (parts.next(), parts.next(), parts.next()) {
                (Some(id), Some(secret), Some(profile))
                    if is_valid_id(id)
                        && is_valid_text(secret)
                        && is_valid_text(profile.trim()) =>
                {
                    Ok(Command::CreateUser {
                        id: id.to_string(),
                        secret: secret.to_string(),
                        profile: profile.trim().to_string(),
                    })
                }
                _ => Err(CommandParseError::Usage(Usage::CreateUser)),
            };
        }

        Err(CommandParseError::Unrecognized(bare.to_string()))
    }
}
