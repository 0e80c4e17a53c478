//! Prefix command dispatch with the administrator gate
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;

use super::context::CommandContext;
use super::handler::Invocation;
use super::handlers::create_all_handlers;
use super::registry::CommandRegistry;
use crate::transport::InboundMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    NotACommand,
    Unknown(String),
    Unauthorized(String),
    Handled(String),
}

pub struct CommandDispatcher {
    prefix: String,
    registry: CommandRegistry,
    ctx: Arc<CommandContext>,
}

impl CommandDispatcher {
    /// Dispatcher with every built-in handler registered
    pub fn new(prefix: impl Into<String>, ctx: CommandContext) -> Self {
        Self {
            prefix: prefix.into(),
            registry: CommandRegistry::with_handlers(create_all_handlers()),
            ctx: Arc::new(ctx),
        }
    }

    pub fn context(&self) -> Arc<CommandContext> {
        Arc::clone(&self.ctx)
    }

    /// Whether `content` invokes a registered command
    pub fn is_command(&self, content: &str) -> bool {
        Invocation::parse(&self.prefix, content)
            .is_some_and(|invocation| self.registry.get(&invocation.name).is_some())
    }

    pub async fn dispatch(&self, msg: &InboundMessage) -> Result<DispatchOutcome> {
        let Some(invocation) = Invocation::parse(&self.prefix, &msg.content) else {
            return Ok(DispatchOutcome::NotACommand);
        };
        let request_id = invocation.request_id;

        let Some(handler) = self.registry.get(&invocation.name) else {
            debug!("[{request_id}] Ignoring unknown command '{}'", invocation.name);
            return Ok(DispatchOutcome::Unknown(invocation.name));
        };

        if !msg.author_is_admin {
            warn!(
                "[{request_id}] 🚫 {} ({}) is not allowed to run '{}'",
                msg.author.name, msg.author.id, invocation.name
            );
            return Ok(DispatchOutcome::Unauthorized(invocation.name));
        }

        info!(
            "[{request_id}] 📥 Command '{}' from {} in channel {}",
            invocation.name, msg.author.name, msg.channel_id
        );
        handler.handle(self.context(), msg, &invocation).await?;
        info!("[{request_id}] ✅ Command '{}' completed", invocation.name);
        Ok(DispatchOutcome::Handled(invocation.name))
    }
}
