//! Handler context and the `Handler` trait.

use crate::error::{HandlerError, HandlerResult, Missing};
use crate::state::{Matrix, PendingRequest, SessionId};
use async_trait::async_trait;
use emcom_proto::{Command, Reply, RoleLevel};
use std::sync::Arc;

/// Per-connection state that outlives a single command.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Snapshot shown by `aprovar`; while set, the next line is a selection.
    pub approval_menu: Option<Vec<PendingRequest>>,
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The authenticated client id.
    pub client_id: &'a str,
    pub session_id: SessionId,
    /// Shared server state.
    pub matrix: &'a Arc<Matrix>,
    pub state: &'a mut SessionState,
    replies: Vec<Reply>,
}

impl<'a> Context<'a> {
    pub fn new(
        client_id: &'a str,
        session_id: SessionId,
        matrix: &'a Arc<Matrix>,
        state: &'a mut SessionState,
    ) -> Self {
        Self {
            client_id,
            session_id,
            matrix,
            state,
            replies: Vec::new(),
        }
    }

    /// Queue a line for the calling client. Replies are written in order once
    /// the handler returns, before the next line is read.
    pub fn reply(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    /// Drain the replies queued so far.
    pub fn take_replies(&mut self) -> Vec<Reply> {
        std::mem::take(&mut self.replies)
    }

    /// Role of the calling client.
    pub fn role(&self) -> Result<RoleLevel, HandlerError> {
        self.matrix
            .credential_manager
            .role_of(self.client_id)
            .ok_or(HandlerError::NotFound(Missing::Role))
    }
}

/// Handler trait for authenticated commands.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult;
}
