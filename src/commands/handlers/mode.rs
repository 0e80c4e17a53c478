//! Mode command handlers
//!
//! Handles: alerta, silencio, ligar, desligar, statusx
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Add ligar/desligar to toggle broadcasting
//! - 1.0.0: alerta, silencio, statusx

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::commands::context::{CommandContext, PERSIST_FAILURE};
use crate::commands::handler::{Invocation, PrefixCommandHandler};
use crate::transport::InboundMessage;

pub const ALERT_ON: &str = "ALERTA ATIVADO: TRANSMISSÃO CORROMPIDA";
pub const ALERT_OFF: &str = "SILÊNCIO RESTAURADO.";
pub const BROADCAST_RESUMED: &str = "TRANSMISSÃO RETOMADA.";
pub const BROADCAST_SUSPENDED: &str = "TRANSMISSÃO SUSPENSA.";

/// Handler for apocalypse and enabled switches
pub struct ModeHandler;

#[async_trait]
impl PrefixCommandHandler for ModeHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["alerta", "silencio", "ligar", "desligar", "statusx"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()> {
        match invocation.name.as_str() {
            "alerta" => self.handle_alert(&ctx, msg, invocation, true).await,
            "silencio" => self.handle_alert(&ctx, msg, invocation, false).await,
            "ligar" => self.handle_enabled(&ctx, msg, invocation, true).await,
            "desligar" => self.handle_enabled(&ctx, msg, invocation, false).await,
            "statusx" => self.handle_status(&ctx, msg).await,
            _ => Ok(()),
        }
    }
}

impl ModeHandler {
    async fn handle_alert(
        &self,
        ctx: &CommandContext,
        msg: &InboundMessage,
        invocation: &Invocation,
        on: bool,
    ) -> Result<()> {
        let request_id = invocation.request_id;
        let persisted = ctx.state.set_apocalypse(on).await;
        info!("[{request_id}] Apocalypse set to {on} by {}", msg.author.name);

        ctx.identity.shift(on).await;
        if let Err(e) = persisted {
            warn!("[{request_id}] Apocalypse change not persisted: {e}");
            return ctx.reply(msg.channel_id, PERSIST_FAILURE).await;
        }
        let confirmation = if on { ALERT_ON } else { ALERT_OFF };
        ctx.reply(msg.channel_id, confirmation).await
    }

    async fn handle_enabled(
        &self,
        ctx: &CommandContext,
        msg: &InboundMessage,
        invocation: &Invocation,
        enabled: bool,
    ) -> Result<()> {
        let request_id = invocation.request_id;
        if let Err(e) = ctx.state.set_enabled(enabled).await {
            warn!("[{request_id}] Broadcasting toggle not persisted: {e}");
            return ctx.reply(msg.channel_id, PERSIST_FAILURE).await;
        }
        info!("[{request_id}] Broadcasting enabled={enabled} by {}", msg.author.name);

        let confirmation = if enabled {
            BROADCAST_RESUMED
        } else {
            BROADCAST_SUSPENDED
        };
        ctx.reply(msg.channel_id, confirmation).await
    }

    async fn handle_status(&self, ctx: &CommandContext, msg: &InboundMessage) -> Result<()> {
        let state = ctx.state.snapshot().await;
        let status = format!(
            "APOCALYPSE: {} - ENABLED: {}",
            state.apocalypse, state.enabled
        );
        ctx.reply(msg.channel_id, &status).await
    }
}
