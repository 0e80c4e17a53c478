//! Prefix command handler trait and infrastructure
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::context::CommandContext;
use crate::transport::InboundMessage;

/// A parsed `!name arg arg` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
    pub request_id: Uuid,
}

impl Invocation {
    /// Parse `content` if it starts with `prefix` followed by a command name
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        let rest = content.trim().strip_prefix(prefix)?;
        if rest.starts_with(char::is_whitespace) {
            return None;
        }
        let mut parts = rest.split_whitespace();
        let name = parts.next()?.to_lowercase();
        Some(Self {
            name,
            args: parts.map(str::to_string).collect(),
            request_id: Uuid::new_v4(),
        })
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Trait for prefix command handlers
///
/// Each handler serves one or more command names. Handlers are registered with a
/// `CommandRegistry` and only run once the caller passed the admin check.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl PrefixCommandHandler for PingHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["ping"]
///     }
///
///     async fn handle(
///         &self,
///         ctx: Arc<CommandContext>,
///         msg: &InboundMessage,
///         invocation: &Invocation,
///     ) -> Result<()> {
///         ctx.reply(msg.channel_id, "pong").await
///     }
/// }
/// ```
#[async_trait]
pub trait PrefixCommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    /// Handle the command
    ///
    /// # Arguments
    ///
    /// * `ctx` - Shared command context with state, cipher, catalog and transport
    /// * `msg` - The inbound message carrying the command
    /// * `invocation` - Parsed command name and arguments
    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()>;
}
