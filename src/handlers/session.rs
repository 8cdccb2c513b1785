//! Session commands: `ajuda` and `sair`.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use emcom_proto::{Command, Reply};

pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _cmd: &Command) -> HandlerResult {
        ctx.reply(Reply::Help);
        Ok(())
    }
}

/// Ends the session after saying goodbye.
pub struct LogoutHandler;

#[async_trait]
impl Handler for LogoutHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _cmd: &Command) -> HandlerResult {
        ctx.reply(Reply::Disconnecting);
        Err(HandlerError::Quit)
    }
}
