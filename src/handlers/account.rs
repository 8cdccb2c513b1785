//! `criar_user:<id>:<senha>:<perfil>`

use super::{Context, Handler};
use crate::error::{Denied, HandlerError, HandlerResult};
use crate::security::can_create_user;
use async_trait::async_trait;
use emcom_proto::{Command, Reply};

pub struct CreateUserHandler;

#[async_trait]
impl Handler for CreateUserHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::CreateUser {
            id,
            secret,
            profile,
        } = cmd
        else {
            return Err(HandlerError::Internal(format!(
                "unexpected command {}",
                cmd.name()
            )));
        };

        let min_level = ctx.matrix.config.security.user_creation_min_level;
        if !can_create_user(ctx.role()?, min_level) {
            return Err(HandlerError::AuthorizationDenied(Denied::CreateUser));
        }

        let role = ctx
            .matrix
            .credential_manager
            .create_user(id, secret, profile)
            .await?;
        ctx.reply(Reply::UserCreated {
            id: id.clone(),
            role,
        });
        Ok(())
    }
}
