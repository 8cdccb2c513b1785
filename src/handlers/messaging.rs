//! Messaging handlers: direct messages, channel messages and reading the
//! message log.
//!
//! Every message is appended to the message log before delivery is
//! attempted, so an offline recipient can still read it later with
//! `ler mensagens`.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult, Missing};
use crate::store::MessageRecord;
use async_trait::async_trait;
use emcom_proto::{Command, Reply};
use tracing::{debug, warn};

fn unexpected(cmd: &Command) -> HandlerError {
    HandlerError::Internal(format!("unexpected command {}", cmd.name()))
}

/// `mensagem:<id>:<texto>`
pub struct DirectMessageHandler;

#[async_trait]
impl Handler for DirectMessageHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::DirectMessage { target, text } = cmd else {
            return Err(unexpected(cmd));
        };

        if !ctx.matrix.credential_manager.contains(target) {
            return Err(HandlerError::NotFound(Missing::User(target.clone())));
        }

        ctx.matrix
            .record_message(&MessageRecord::Direct {
                from: ctx.client_id.to_string(),
                to: target.clone(),
                text: text.clone(),
            })
            .await?;

        let Some(session) = ctx.matrix.session_manager.get(target) else {
            debug!(to = %target, "Recipient offline, message stored");
            ctx.reply(Reply::RecipientOffline(target.clone()));
            return Ok(());
        };

        let reply = Reply::DirectReceived {
            from: ctx.client_id.to_string(),
            text: text.clone(),
        };
        match session.deliver(reply) {
            Ok(()) => ctx.reply(Reply::MessageSent(target.clone())),
            Err(e) => {
                warn!(to = %target, error = %e, "Direct delivery failed");
                ctx.reply(Reply::RecipientOffline(target.clone()));
            }
        }
        Ok(())
    }
}

/// `canal:<canal>:<texto>`
pub struct ChannelMessageHandler;

#[async_trait]
impl Handler for ChannelMessageHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::ChannelMessage { channel, text } = cmd else {
            return Err(unexpected(cmd));
        };

        let chan = ctx
            .matrix
            .channel_manager
            .get(channel)
            .ok_or_else(|| HandlerError::NotFound(Missing::Channel(channel.clone())))?;
        if !chan.is_member(ctx.client_id) {
            return Err(HandlerError::MustJoinFirst(channel.clone()));
        }

        ctx.matrix
            .record_message(&MessageRecord::Channel {
                channel: channel.clone(),
                from: ctx.client_id.to_string(),
                text: text.clone(),
            })
            .await?;

        let delivered = chan.broadcast(ctx.client_id, text, &ctx.matrix.session_manager);
        debug!(channel = %channel, delivered, "Channel message broadcast");
        ctx.reply(Reply::ChannelMessageSent(channel.clone()));
        Ok(())
    }
}

/// `ler mensagens`
pub struct ReadMessagesHandler;

#[async_trait]
impl Handler for ReadMessagesHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _cmd: &Command) -> HandlerResult {
        let messages = ctx.matrix.stored_messages_for(ctx.client_id).await?;
        if messages.is_empty() {
            ctx.reply(Reply::NoStoredMessages);
            return Ok(());
        }
        for line in messages {
            ctx.reply(Reply::StoredMessage(line));
        }
        Ok(())
    }
}
