//! `mensagem emergencia:<texto>`
//!
//! Reaches every live session, the sender included, then every channel.
//! A recipient that cannot be reached is logged and skipped.

use super::{Context, Handler};
use crate::error::{Denied, HandlerError, HandlerResult};
use crate::security::can_send_emergency;
use crate::store::MessageRecord;
use async_trait::async_trait;
use emcom_proto::{Command, Reply};
use tracing::{info, warn};

/// Prefix carried by the channel copies of an emergency message.
const CHANNEL_PREFIX: &str = "[EMERGÊNCIA] ";

pub struct EmergencyHandler;

#[async_trait]
impl Handler for EmergencyHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::Emergency(text) = cmd else {
            return Err(HandlerError::Internal(format!(
                "unexpected command {}",
                cmd.name()
            )));
        };

        if !can_send_emergency(ctx.role()?) {
            warn!(client_id = %ctx.client_id, "Emergency broadcast denied");
            return Err(HandlerError::AuthorizationDenied(Denied::Emergency));
        }

        let notice = Reply::EmergencyReceived {
            from: ctx.client_id.to_string(),
            text: text.clone(),
        };

        let mut sessions = 0usize;
        for session in ctx.matrix.session_manager.all() {
            if session.client_id == ctx.client_id {
                continue;
            }
            match session.deliver(notice.clone()) {
                Ok(()) => sessions += 1,
                Err(e) => {
                    warn!(to = %session.client_id, error = %e, "Emergency delivery failed")
                }
            }
        }
        // Our own copy goes out on this connection, ahead of the confirmation.
        ctx.reply(notice);

        let channel_text = format!("{CHANNEL_PREFIX}{text}");
        let channels = ctx.matrix.channel_manager.all();
        for channel in &channels {
            let record = MessageRecord::Channel {
                channel: channel.id().to_string(),
                from: ctx.client_id.to_string(),
                text: channel_text.clone(),
            };
            if let Err(e) = ctx.matrix.record_message(&record).await {
                warn!(channel = %channel.id(), error = %e, "Failed to log emergency message");
            }
            channel.broadcast(ctx.client_id, &channel_text, &ctx.matrix.session_manager);
        }

        info!(
            client_id = %ctx.client_id,
            sessions,
            channels = channels.len(),
            "Emergency broadcast sent"
        );
        ctx.reply(Reply::EmergencySent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::Registry;
    use crate::handlers::test_support::{TestSession, matrix_with_users};

    const USERS: &[&str] = &["alice:pw:todos", "bob:pw:todos", "root:pw:Administrador"];

    #[tokio::test]
    async fn reaches_every_session_and_channel() {
        let matrix = matrix_with_users(USERS).await;
        let registry = Registry::new();
        let mut alice = TestSession::new(&matrix, "alice");
        let mut bob = TestSession::new(&matrix, "bob");
        let mut root = TestSession::new(&matrix, "root");

        alice.lines(&registry, "criar canal:norte").await;
        alice.lines(&registry, "entrar canal:norte").await;

        assert_eq!(
            root.lines(&registry, "mensagem emergencia:evacuar").await,
            vec![
                "[EMERGÊNCIA] Mensagem de root: evacuar",
                "Mensagem de emergência enviada com sucesso.",
            ]
        );
        assert_eq!(
            alice.delivered(),
            vec![
                "[EMERGÊNCIA] Mensagem de root: evacuar",
                "Mensagem recebida de root (canal norte): [EMERGÊNCIA] evacuar",
            ]
        );
        assert_eq!(bob.delivered(), vec!["[EMERGÊNCIA] Mensagem de root: evacuar"]);
        assert!(root.delivered().is_empty());

        assert_eq!(
            alice.lines(&registry, "ler mensagens").await,
            vec!["Canal: norte De: root Mensagem: [EMERGÊNCIA] evacuar"]
        );
    }

    #[tokio::test]
    async fn non_admin_is_denied() {
        let matrix = matrix_with_users(USERS).await;
        let registry = Registry::new();
        let mut alice = TestSession::new(&matrix, "alice");
        let mut bob = TestSession::new(&matrix, "bob");

        assert_eq!(
            alice.lines(&registry, "mensagem emergencia:test").await,
            vec!["Você não tem permissão para enviar mensagens de emergência."]
        );
        assert!(bob.delivered().is_empty());
    }
}
