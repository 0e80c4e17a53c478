//! Avatar command handlers
//!
//! Handles: avatar, cycleavatar
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use rand::seq::IndexedRandom;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{Invocation, PrefixCommandHandler};
use crate::features::assets::file_name;
use crate::transport::InboundMessage;

pub const NO_AVATARS: &str = "Nenhum avatar disponível.";
pub const AVATAR_FAILED: &str = "Falha ao atualizar avatar.";

pub struct AvatarHandler;

#[async_trait]
impl PrefixCommandHandler for AvatarHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["avatar", "cycleavatar"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()> {
        match invocation.name.as_str() {
            "avatar" => self.handle_set(&ctx, msg, invocation).await,
            "cycleavatar" => self.handle_cycle(&ctx, msg, invocation).await,
            _ => Ok(()),
        }
    }
}

impl AvatarHandler {
    async fn handle_set(
        &self,
        ctx: &CommandContext,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()> {
        let Some(name) = invocation.arg(0) else {
            let avatars = ctx.assets.avatars();
            if avatars.is_empty() {
                return ctx.reply(msg.channel_id, NO_AVATARS).await;
            }
            let names: Vec<&str> = avatars.iter().map(|p| file_name(p)).collect();
            return ctx
                .reply(msg.channel_id, &format!("AVATARES: {}", names.join(", ")))
                .await;
        };

        let Some(path) = ctx.assets.find_avatar(name) else {
            return ctx
                .reply(msg.channel_id, &format!("Avatar não encontrado: {name}"))
                .await;
        };

        info!("[{}] Setting avatar to {name}", invocation.request_id);
        if ctx.identity.update_avatar(&path).await {
            ctx.reply(msg.channel_id, &format!("AVATAR ATUALIZADO: {}", file_name(&path)))
                .await
        } else {
            ctx.reply(msg.channel_id, AVATAR_FAILED).await
        }
    }

    async fn handle_cycle(
        &self,
        ctx: &CommandContext,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()> {
        let choice = ctx.assets.avatars().choose(&mut rand::rng()).cloned();
        let Some(path) = choice else {
            return ctx.reply(msg.channel_id, NO_AVATARS).await;
        };

        info!("[{}] Cycling avatar to {}", invocation.request_id, path.display());
        if ctx.identity.update_avatar(&path).await {
            ctx.reply(msg.channel_id, &format!("AVATAR ATUALIZADO: {}", file_name(&path)))
                .await
        } else {
            ctx.reply(msg.channel_id, AVATAR_FAILED).await
        }
    }
}
