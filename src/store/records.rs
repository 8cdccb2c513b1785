//! Line formats of the persisted logs.
//!
//! Every record renders with `Display` and parses back with `FromStr`. The
//! formats are plain text so existing data directories stay readable.

use emcom_proto::{OperationType, RoleLevel, is_valid_id};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {what} record: {line}")]
pub struct RecordParseError {
    what: &'static str,
    line: String,
}

impl RecordParseError {
    fn new(what: &'static str, line: &str) -> Self {
        Self {
            what,
            line: line.to_string(),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// `<id>:<secret>:<profile name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub secret: String,
    pub role: RoleLevel,
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.id, self.secret, self.role.profile_name())
    }
}

impl FromStr for UserRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = || RecordParseError::new("user", line);
        let mut parts = line.splitn(3, ':');
        let (Some(id), Some(secret), Some(profile)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };
        if !is_valid_id(id) {
            return Err(err());
        }
        let role = RoleLevel::from_profile(profile.trim()).ok_or_else(err)?;
        Ok(Self {
            id: id.to_string(),
            secret: secret.to_string(),
            role,
        })
    }
}

// ============================================================================
// Membership
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Joined,
    Left,
}

impl MembershipAction {
    fn keyword(self) -> &'static str {
        match self {
            Self::Joined => "entrou",
            Self::Left => "saiu",
        }
    }
}

/// `<client> <entrou|saiu> <channel>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipEvent {
    pub client: String,
    pub action: MembershipAction,
    pub channel: String,
}

impl MembershipEvent {
    pub fn joined(client: &str, channel: &str) -> Self {
        Self {
            client: client.to_string(),
            action: MembershipAction::Joined,
            channel: channel.to_string(),
        }
    }

    pub fn left(client: &str, channel: &str) -> Self {
        Self {
            client: client.to_string(),
            action: MembershipAction::Left,
            channel: channel.to_string(),
        }
    }
}

impl fmt::Display for MembershipEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.client, self.action.keyword(), self.channel)
    }
}

impl FromStr for MembershipEvent {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let (Some(client), Some(action), Some(channel)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(RecordParseError::new("membership", line));
        };
        let action = match action {
            "entrou" => MembershipAction::Joined,
            "saiu" => MembershipAction::Left,
            _ => return Err(RecordParseError::new("membership", line)),
        };
        Ok(Self {
            client: client.to_string(),
            action,
            channel: channel.to_string(),
        })
    }
}

// ============================================================================
// Messages
// ============================================================================

/// A logged direct or channel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRecord {
    /// `De: <from> Para: <to> Mensagem: <text>`
    Direct {
        from: String,
        to: String,
        text: String,
    },
    /// `Canal: <channel> De: <from> Mensagem: <text>`
    Channel {
        channel: String,
        from: String,
        text: String,
    },
}

impl MessageRecord {
    /// Whether `client` should see this record in `ler mensagens`, given
    /// the channels it currently belongs to.
    pub fn visible_to<'a, I>(&self, client: &str, mut channels: I) -> bool
    where
        I: Iterator<Item = &'a String>,
    {
        match self {
            Self::Direct { to, .. } => to == client,
            Self::Channel { channel, .. } => channels.any(|c| c == channel),
        }
    }
}

impl fmt::Display for MessageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct { from, to, text } => {
                write!(f, "De: {from} Para: {to} Mensagem: {text}")
            }
            Self::Channel {
                channel,
                from,
                text,
            } => write!(f, "Canal: {channel} De: {from} Mensagem: {text}"),
        }
    }
}

impl FromStr for MessageRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = || RecordParseError::new("message", line);

        if let Some(rest) = line.strip_prefix("De: ") {
            let (from, rest) = rest.split_once(" Para: ").ok_or_else(err)?;
            let (to, text) = rest.split_once(" Mensagem: ").ok_or_else(err)?;
            return Ok(Self::Direct {
                from: from.to_string(),
                to: to.to_string(),
                text: text.to_string(),
            });
        }

        if let Some(rest) = line.strip_prefix("Canal: ") {
            let (channel, rest) = rest.split_once(" De: ").ok_or_else(err)?;
            let (from, text) = rest.split_once(" Mensagem: ").ok_or_else(err)?;
            return Ok(Self::Channel {
                channel: channel.to_string(),
                from: from.to_string(),
                text: text.to_string(),
            });
        }

        Err(err())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A line of the request log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestRecord {
    /// `<client>:<OP>:PENDING`
    Pending {
        client: String,
        operation: OperationType,
    },
    /// `<client>:<OP>:APPROVED:<approver>`, clears every earlier pending
    /// record for the same pair.
    Approved {
        client: String,
        operation: OperationType,
        approver: String,
    },
}

impl fmt::Display for RequestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending { client, operation } => write!(f, "{client}:{operation}:PENDING"),
            Self::Approved {
                client,
                operation,
                approver,
            } => write!(f, "{client}:{operation}:APPROVED:{approver}"),
        }
    }
}

impl FromStr for RequestRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = || RecordParseError::new("request", line);
        let parts: Vec<&str> = line.split(':').collect();
        match parts.as_slice() {
            [client, op, "PENDING"] => Ok(Self::Pending {
                client: client.to_string(),
                operation: op.parse().map_err(|_| err())?,
            }),
            [client, op, "APPROVED", approver] => Ok(Self::Approved {
                client: client.to_string(),
                operation: op.parse().map_err(|_| err())?,
                approver: approver.to_string(),
            }),
            _ => Err(err()),
        }
    }
}
