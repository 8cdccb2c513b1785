//! Channel membership handlers: create, join, leave.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use emcom_proto::{Command, Reply};

fn unexpected(cmd: &Command) -> HandlerError {
    HandlerError::Internal(format!("unexpected command {}", cmd.name()))
}

/// `criar canal:<canal>`
pub struct CreateChannelHandler;

#[async_trait]
impl Handler for CreateChannelHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::CreateChannel(id) = cmd else {
            return Err(unexpected(cmd));
        };
        ctx.matrix.channel_manager.create(id).await?;
        ctx.reply(Reply::ChannelCreated(id.clone()));
        Ok(())
    }
}

/// `entrar canal:<canal>`
pub struct JoinChannelHandler;

#[async_trait]
impl Handler for JoinChannelHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::JoinChannel(id) = cmd else {
            return Err(unexpected(cmd));
        };
        ctx.matrix.channel_manager.join(ctx.client_id, id).await?;
        ctx.reply(Reply::ChannelJoined(id.clone()));
        Ok(())
    }
}

/// `sair canal:<canal>`
pub struct LeaveChannelHandler;

#[async_trait]
impl Handler for LeaveChannelHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::LeaveChannel(id) = cmd else {
            return Err(unexpected(cmd));
        };
        ctx.matrix.channel_manager.leave(ctx.client_id, id).await?;
        ctx.reply(Reply::ChannelLeft(id.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::Registry;
    use crate::handlers::test_support::{FlakyStore, TestSession, matrix_over, matrix_with_users};
    use crate::store::LogKind;

    const STORAGE_FAILURE: &str =
        "Erro ao processar o comando: falha no armazenamento. Tente novamente.";

    #[tokio::test]
    async fn failed_append_leaves_no_channel_behind() {
        let store = FlakyStore::with_users(&["alice:pw:todos"]);
        let matrix = matrix_over(store.clone()).await;
        let registry = Registry::new();
        let mut alice = TestSession::new(&matrix, "alice");

        store.set_failing(true);
        assert_eq!(
            alice.lines(&registry, "criar canal:geral").await,
            vec![STORAGE_FAILURE]
        );
        assert!(matrix.channel_manager.get("geral").is_none());
        assert_eq!(
            alice.lines(&registry, "entrar canal:geral").await,
            vec!["Canal geral não encontrado."]
        );

        store.set_failing(false);
        assert_eq!(
            alice.lines(&registry, "criar canal:geral").await,
            vec!["Canal geral criado com sucesso!"]
        );
        assert_eq!(
            matrix.store.read_all(LogKind::Channels).await.unwrap(),
            vec!["geral"]
        );
    }

    #[tokio::test]
    async fn failed_join_append_keeps_membership_unchanged() {
        let store = FlakyStore::with_users(&["alice:pw:todos"]);
        let matrix = matrix_over(store.clone()).await;
        let registry = Registry::new();
        let mut alice = TestSession::new(&matrix, "alice");
        alice.lines(&registry, "criar canal:geral").await;

        store.set_failing(true);
        assert_eq!(
            alice.lines(&registry, "entrar canal:geral").await,
            vec![STORAGE_FAILURE]
        );
        let channel = matrix.channel_manager.get("geral").unwrap();
        assert!(!channel.is_member("alice"));

        store.set_failing(false);
        assert_eq!(
            alice.lines(&registry, "entrar canal:geral").await,
            vec!["Você entrou no canal geral"]
        );
    }

    #[tokio::test]
    async fn create_join_leave_cycle() {
        let matrix = matrix_with_users(&["alice:pw:todos"]).await;
        let registry = Registry::new();
        let mut alice = TestSession::new(&matrix, "alice");

        assert_eq!(
            alice.lines(&registry, "criar canal:geral").await,
            vec!["Canal geral criado com sucesso!"]
        );
        assert_eq!(
            alice.lines(&registry, "criar canal:geral").await,
            vec!["Canal geral já existe."]
        );
        assert_eq!(
            alice.lines(&registry, "entrar canal:geral").await,
            vec!["Você entrou no canal geral"]
        );
        assert_eq!(
            alice.lines(&registry, "entrar canal:geral").await,
            vec!["Você já está no canal geral"]
        );
        assert_eq!(
            alice.lines(&registry, "sair canal:geral").await,
            vec!["Você saiu do canal geral"]
        );
        assert_eq!(
            alice.lines(&registry, "sair canal:geral").await,
            vec!["Você não está no canal geral"]
        );

        assert_eq!(
            matrix.store.read_all(LogKind::Membership).await.unwrap(),
            vec!["alice entrou geral", "alice saiu geral"]
        );
    }

    #[tokio::test]
    async fn joining_missing_channel_is_not_found() {
        let matrix = matrix_with_users(&["alice:pw:todos"]).await;
        let registry = Registry::new();
        let mut alice = TestSession::new(&matrix, "alice");

        assert_eq!(
            alice.lines(&registry, "entrar canal:nada").await,
            vec!["Canal nada não encontrado."]
        );
        assert!(
            matrix
                .store
                .read_all(LogKind::Membership)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
