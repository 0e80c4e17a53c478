//! Corrupt command handler
//!
//! Handles: corromper
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{Invocation, PrefixCommandHandler};
use crate::transport::{Author, InboundMessage};

pub const HISTORY_WINDOW: u64 = 50;
pub const MAX_CORRUPTED: usize = 5;
pub const NOTHING_FOUND: &str = "Nenhuma mensagem encontrada para corromper.";

/// Re-emits a user's recent messages through the cipher engine
pub struct CorruptHandler;

#[async_trait]
impl PrefixCommandHandler for CorruptHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["corromper"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()> {
        let target: &Author = msg.mentions.first().unwrap_or(&msg.author);

        let history = ctx
            .transport
            .recent_history(msg.channel_id, HISTORY_WINDOW)
            .await?;
        let items: Vec<&str> = history
            .iter()
            .filter(|m| m.author_id == target.id && !m.content.is_empty())
            .take(MAX_CORRUPTED)
            .map(|m| m.content.as_str())
            .collect();

        info!(
            "[{}] Corrupting {} messages from {}",
            invocation.request_id,
            items.len(),
            target.name
        );

        if items.is_empty() {
            return ctx.reply(msg.channel_id, NOTHING_FOUND).await;
        }

        for item in items {
            ctx.reply(msg.channel_id, item).await?;
        }
        ctx.reply(
            msg.channel_id,
            &format!("CORRUPÇÃO COMPLETA: {}", target.display_name),
        )
        .await
    }
}
