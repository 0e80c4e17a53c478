//! Recording transport used by unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use super::{
    Author, ChatTransport, HistoryMessage, InboundMessage, TransportError, TransportResult,
};

pub const BOT_ID: u64 = 999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: u64,
    pub content: String,
    pub attachment: Option<PathBuf>,
}

#[derive(Default)]
pub struct MockTransport {
    pub sent: Mutex<Vec<SentMessage>>,
    pub deleted: Mutex<Vec<(u64, u64)>>,
    pub history: Mutex<HashMap<u64, Vec<HistoryMessage>>>,
    pub avatars: Mutex<Vec<PathBuf>>,
    pub nicknames: Mutex<Vec<(u64, Option<String>)>>,
    pub blackouts: Mutex<Vec<&'static str>>,
    pub guilds: Vec<u64>,
    pub forbid_sends: bool,
    pub fail_avatar: bool,
    next_id: AtomicU64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            guilds: vec![1],
            next_id: AtomicU64::new(10_000),
            ..Default::default()
        }
    }

    pub fn forbidding_sends() -> Self {
        Self {
            forbid_sends: true,
            ..Self::new()
        }
    }

    pub async fn with_history(self, channel_id: u64, history: Vec<HistoryMessage>) -> Self {
        self.history.lock().await.insert(channel_id, history);
        self
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    fn record_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

pub fn author(id: u64, name: &str) -> Author {
    Author {
        id,
        name: name.to_string(),
        display_name: name.to_string(),
    }
}

/// An inbound message from an administrator, sent at noon UTC
pub fn inbound(content: &str) -> InboundMessage {
    InboundMessage {
        channel_id: 42,
        author: author(7, "operator"),
        content: content.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        author_is_admin: true,
        mentions: Vec::new(),
    }
}

pub fn history(id: u64, author_id: u64, content: &str) -> HistoryMessage {
    HistoryMessage {
        id,
        author_id,
        content: content.to_string(),
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn self_id(&self) -> TransportResult<u64> {
        Ok(BOT_ID)
    }

    async fn send_text(&self, channel_id: u64, content: &str) -> TransportResult<u64> {
        if self.forbid_sends {
            return Err(TransportError::Forbidden("missing access".to_string()));
        }
        self.sent.lock().await.push(SentMessage {
            channel_id,
            content: content.to_string(),
            attachment: None,
        });
        Ok(self.record_id())
    }

    async fn send_with_attachment(
        &self,
        channel_id: u64,
        content: &str,
        attachment: &Path,
    ) -> TransportResult<u64> {
        if self.forbid_sends {
            return Err(TransportError::Forbidden("missing access".to_string()));
        }
        self.sent.lock().await.push(SentMessage {
            channel_id,
            content: content.to_string(),
            attachment: Some(attachment.to_path_buf()),
        });
        Ok(self.record_id())
    }

    async fn recent_history(
        &self,
        channel_id: u64,
        limit: u64,
    ) -> TransportResult<Vec<HistoryMessage>> {
        let history = self.history.lock().await;
        Ok(history
            .get(&channel_id)
            .map(|msgs| msgs.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> TransportResult<()> {
        self.deleted.lock().await.push((channel_id, message_id));
        Ok(())
    }

    async fn set_avatar(&self, image: &Path) -> TransportResult<()> {
        if self.fail_avatar {
            return Err(TransportError::Other(anyhow::anyhow!("avatar rate limited")));
        }
        self.avatars.lock().await.push(image.to_path_buf());
        Ok(())
    }

    async fn guild_ids(&self) -> TransportResult<Vec<u64>> {
        Ok(self.guilds.clone())
    }

    async fn set_nickname(&self, guild_id: u64, nickname: Option<&str>) -> TransportResult<()> {
        self.nicknames
            .lock()
            .await
            .push((guild_id, nickname.map(str::to_string)));
        Ok(())
    }

    async fn begin_blackout(&self) -> TransportResult<()> {
        self.blackouts.lock().await.push("begin");
        Ok(())
    }

    async fn end_blackout(&self) -> TransportResult<()> {
        self.blackouts.lock().await.push("end");
        Ok(())
    }
}
