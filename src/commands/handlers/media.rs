//! Media command handlers
//!
//! Handles: interferencia, sendnow
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::{Invocation, PrefixCommandHandler};
use crate::transport::InboundMessage;

pub const INTERFERENCE_CAPTION: &str = "INTERFERÊNCIA...";
pub const NO_MEDIA: &str = "Nenhuma imagem disponível.";

/// Handler for on-demand broadcasts
pub struct MediaHandler;

#[async_trait]
impl PrefixCommandHandler for MediaHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["interferencia", "sendnow"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()> {
        match invocation.name.as_str() {
            "interferencia" => {
                let asset = ctx.assets.list().choose(&mut rand::rng()).cloned();
                match asset {
                    Some(path) => {
                        ctx.reply_with_attachment(msg.channel_id, INTERFERENCE_CAPTION, &path)
                            .await
                    }
                    None => ctx.reply(msg.channel_id, NO_MEDIA).await,
                }
            }
            "sendnow" => {
                let template = ctx.catalog.random(&mut rand::rng()).to_string();
                ctx.reply(msg.channel_id, &template).await
            }
            _ => Ok(()),
        }
    }
}
