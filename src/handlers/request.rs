//! Two-step operation workflow: `solicitar` queues a request, `aprovar`
//! shows the queue and resolves the entry picked on the following line.

use super::{Context, Handler};
use crate::error::{Denied, HandlerError, HandlerResult, Missing};
use crate::security::{Action, can_perform};
use crate::state::PendingRequest;
use async_trait::async_trait;
use emcom_proto::{Command, OperationType, Reply};
use tracing::info;

/// `solicitar:<DRE|ACE|OEM>`
pub struct RequestHandler;

#[async_trait]
impl Handler for RequestHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::Request(code) = cmd else {
            return Err(HandlerError::Internal(format!(
                "unexpected command {}",
                cmd.name()
            )));
        };

        let role = ctx.role()?;
        let op: OperationType = code
            .parse()
            .map_err(|_| HandlerError::InvalidOperation(code.clone()))?;
        if !can_perform(role, op, Action::Request) {
            return Err(HandlerError::AuthorizationDenied(Denied::Request(op)));
        }

        ctx.matrix.request_manager.add(ctx.client_id, op).await?;
        ctx.reply(Reply::RequestRegistered(op));
        Ok(())
    }
}

/// `aprovar`
pub struct ApproveHandler;

#[async_trait]
impl Handler for ApproveHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _cmd: &Command) -> HandlerResult {
        let pending = ctx.matrix.request_manager.list().await;
        if pending.is_empty() {
            ctx.reply(Reply::NoPendingRequests);
            return Ok(());
        }

        ctx.reply(Reply::PendingHeader);
        for (i, req) in pending.iter().enumerate() {
            ctx.reply(Reply::PendingEntry {
                index: i + 1,
                client: req.client.clone(),
                operation: req.operation,
            });
        }
        ctx.reply(Reply::SelectionPrompt);
        ctx.state.approval_menu = Some(pending);
        Ok(())
    }
}

/// Resolve the line typed after an `aprovar` listing against the menu that
/// listing showed. The menu is closed whatever the outcome.
pub async fn handle_selection(
    ctx: &mut Context<'_>,
    menu: &[PendingRequest],
    input: &str,
) -> HandlerResult {
    let input = input.trim();
    if input.eq_ignore_ascii_case("cancelar") {
        ctx.reply(Reply::SelectionCancelled);
        return Ok(());
    }

    let Ok(choice) = input.parse::<usize>() else {
        ctx.reply(Reply::SelectionNotNumber);
        return Ok(());
    };
    let Some(selected) = choice.checked_sub(1).and_then(|i| menu.get(i)) else {
        ctx.reply(Reply::InvalidChoice);
        return Ok(());
    };

    let op = selected.operation;
    let role = ctx.role()?;
    if !can_perform(role, op, Action::Approve) {
        return Err(HandlerError::AuthorizationDenied(Denied::Approve(op)));
    }

    let removed = ctx
        .matrix
        .request_manager
        .resolve(&selected.client, op, ctx.client_id)
        .await?;
    if removed == 0 {
        return Err(HandlerError::NotFound(Missing::PendingRequest(op)));
    }

    info!(client_id = %selected.client, op = %op, "Approval granted");
    ctx.reply(Reply::RequestApproved(op));
    Ok(())
}
