//! Command handler registry and dispatch.
//!
//! The `Registry` maps each command to its handler and keeps usage counters
//! that the periodic report logs.

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    account::CreateUserHandler,
    channel::{CreateChannelHandler, JoinChannelHandler, LeaveChannelHandler},
    emergency::EmergencyHandler,
    messaging::{ChannelMessageHandler, DirectMessageHandler, ReadMessagesHandler},
    request::{ApproveHandler, RequestHandler, handle_selection},
    session::{HelpHandler, LogoutHandler},
};
use crate::telemetry::spans;
use emcom_proto::Command;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Instrument, debug};

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    /// Command usage counters for the periodic report
    command_counts: HashMap<&'static str, Arc<AtomicU64>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        handlers.insert("AJUDA", Box::new(HelpHandler));
        handlers.insert("SAIR", Box::new(LogoutHandler));

        // Messaging handlers
        handlers.insert("MENSAGEM", Box::new(DirectMessageHandler));
        handlers.insert("CANAL", Box::new(ChannelMessageHandler));
        handlers.insert("LER_MENSAGENS", Box::new(ReadMessagesHandler));

        // Channel handlers
        handlers.insert("CRIAR_CANAL", Box::new(CreateChannelHandler));
        handlers.insert("ENTRAR_CANAL", Box::new(JoinChannelHandler));
        handlers.insert("SAIR_CANAL", Box::new(LeaveChannelHandler));

        // Request workflow
        handlers.insert("SOLICITAR", Box::new(RequestHandler));
        handlers.insert("APROVAR", Box::new(ApproveHandler));

        // Administration
        handlers.insert("CRIAR_USER", Box::new(CreateUserHandler));
        handlers.insert("EMERGENCIA", Box::new(EmergencyHandler));

        let mut command_counts = HashMap::new();
        for &cmd in handlers.keys() {
            command_counts.insert(cmd, Arc::new(AtomicU64::new(0)));
        }

        Self {
            handlers,
            command_counts,
        }
    }

    /// Command usage statistics, most used first. Unused commands are omitted.
    pub fn get_command_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (*cmd, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }

    /// Dispatch one client line.
    ///
    /// While an approval menu is open the line is taken as the menu selection
    /// instead of a command.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, line: &str) -> HandlerResult {
        if let Some(menu) = ctx.state.approval_menu.take() {
            let selection_span = spans::command("APROVAR", ctx.client_id, ctx.session_id);
            return handle_selection(ctx, &menu, line)
                .instrument(selection_span)
                .await;
        }

        let cmd = Command::parse(line)?;
        let cmd_name = cmd.name();
        let handler = self
            .handlers
            .get(cmd_name)
            .ok_or_else(|| HandlerError::Internal(format!("no handler for {cmd_name}")))?;

        if let Some(counter) = self.command_counts.get(cmd_name) {
            counter.fetch_add(1, Ordering::Relaxed);
        }

        let cmd_span = spans::command(cmd_name, ctx.client_id, ctx.session_id);

        let result = handler.handle(ctx, &cmd).instrument(cmd_span).await;
        if let Err(ref e) = result {
            debug!(command = cmd_name, error_code = e.error_code(), error = %e, "Command error");
        }
        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{TestSession, matrix_with_users};
    use emcom_proto::Reply;

    #[test]
    fn every_command_has_a_handler() {
        let registry = Registry::new();
        for line in [
            "ajuda",
            "sair",
            "mensagem:a:b",
            "canal:a:b",
            "criar canal:a",
            "entrar canal:a",
            "sair canal:a",
            "solicitar:DRE",
            "aprovar",
            "ler mensagens",
            "criar_user:a:b:todos",
            "mensagem emergencia:x",
        ] {
            let cmd = Command::parse(line).unwrap();
            assert!(registry.handlers.contains_key(cmd.name()), "{line}");
        }
    }

    #[tokio::test]
    async fn counts_dispatched_commands() {
        let matrix = matrix_with_users(&["alice:pw:todos"]).await;
        let registry = Registry::new();
        let mut session = TestSession::new(&matrix, "alice");

        session.run(&registry, "ajuda").await.unwrap();
        session.run(&registry, "AJUDA").await.unwrap();
        session.run(&registry, "ler mensagens").await.unwrap();

        assert_eq!(
            registry.get_command_stats(),
            vec![("AJUDA", 2), ("LER_MENSAGENS", 1)]
        );
    }

    #[tokio::test]
    async fn unknown_and_malformed_lines_are_errors() {
        let matrix = matrix_with_users(&["alice:pw:todos"]).await;
        let registry = Registry::new();
        let mut session = TestSession::new(&matrix, "alice");

        let err = session.run(&registry, "olá").await.unwrap_err();
        assert_eq!(err.to_reply(), Some(Reply::Unknown));

        let err = session.run(&registry, "entrar canal:").await.unwrap_err();
        assert_eq!(err.error_code(), "invalid_format");
        assert!(registry.get_command_stats().is_empty());
    }
}
