//! # Chat Transport
//!
//! Narrow interface over the chat platform. Everything the broadcaster does on the wire goes
//! through [`ChatTransport`], so the scheduling core never touches serenity types directly.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add blackout hooks for gateway teardown and resume
//! - 1.0.0: Initial release with send, history, delete, avatar and nickname calls

pub mod discord;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;

pub use discord::SerenityTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TransportError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, TransportError::Forbidden(_))
    }
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// A user as seen in an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub display_name: String,
}

/// Inbound message event, already stripped of platform types
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: u64,
    pub author: Author,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Whether the author holds administrative capability in this guild. Only resolved for
    /// messages that name a registered command.
    pub author_is_admin: bool,
    pub mentions: Vec<Author>,
}

/// One entry of a channel's recent history, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub id: u64,
    pub author_id: u64,
    pub content: String,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Id of the account the process is logged in as
    async fn self_id(&self) -> TransportResult<u64>;

    /// Send a plain text message, returning the new message id
    async fn send_text(&self, channel_id: u64, content: &str) -> TransportResult<u64>;

    /// Send a text message with one file attached
    async fn send_with_attachment(
        &self,
        channel_id: u64,
        content: &str,
        attachment: &Path,
    ) -> TransportResult<u64>;

    /// Fetch up to `limit` most recent messages of a channel, newest first
    async fn recent_history(
        &self,
        channel_id: u64,
        limit: u64,
    ) -> TransportResult<Vec<HistoryMessage>>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> TransportResult<()>;

    /// Replace the account's avatar with the image at `image`
    async fn set_avatar(&self, image: &Path) -> TransportResult<()>;

    /// Guilds the account is a member of
    async fn guild_ids(&self) -> TransportResult<Vec<u64>>;

    /// Set (or clear with `None`) the account's nickname in one guild
    async fn set_nickname(&self, guild_id: u64, nickname: Option<&str>) -> TransportResult<()>;

    /// Tear down the live gateway connection
    async fn begin_blackout(&self) -> TransportResult<()>;

    /// Allow the gateway connection to be re-established
    async fn end_blackout(&self) -> TransportResult<()>;
}
