//! Serenity-backed [`ChatTransport`].
//!
//! Uses a single REST client that outlives gateway reconnects, so the scheduler keeps a valid
//! handle across a blackout.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use serenity::http::{Http, HttpError};
use serenity::model::channel::{AttachmentType, Message};
use serenity::model::id::{ChannelId, GuildId, MessageId};
use serenity::model::ModelError;
use serenity::prelude::{Context, SerenityError};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{
    Author, ChatTransport, HistoryMessage, InboundMessage, TransportError, TransportResult,
};
use crate::core::GatewayControl;

impl From<SerenityError> for TransportError {
    fn from(err: SerenityError) -> Self {
        match &err {
            SerenityError::Model(ModelError::InvalidPermissions(_)) => {
                TransportError::Forbidden(err.to_string())
            }
            SerenityError::Http(http_err) => match http_err.as_ref() {
                HttpError::UnsuccessfulRequest(resp) if resp.status_code.as_u16() == 403 => {
                    TransportError::Forbidden(resp.error.message.clone())
                }
                HttpError::UnsuccessfulRequest(resp) if resp.status_code.as_u16() == 404 => {
                    TransportError::NotFound(resp.error.message.clone())
                }
                _ => TransportError::Other(anyhow::anyhow!(err.to_string())),
            },
            _ => TransportError::Other(anyhow::anyhow!(err.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct SerenityTransport {
    http: Arc<Http>,
    gateway: GatewayControl,
    self_id: Arc<OnceCell<u64>>,
}

impl SerenityTransport {
    pub fn new(http: Arc<Http>, gateway: GatewayControl) -> Self {
        Self {
            http,
            gateway,
            self_id: Arc::new(OnceCell::new()),
        }
    }

    /// Convert a serenity message into the platform-neutral inbound event.
    ///
    /// Admin status and mention nicknames can cost a REST member fetch each, so they are only
    /// resolved when `resolve_members` is set; otherwise the author is treated as unprivileged
    /// and mentions carry their usernames.
    pub async fn to_inbound(ctx: &Context, msg: &Message, resolve_members: bool) -> InboundMessage {
        let nick = msg.member.as_ref().and_then(|m| m.nick.as_deref());
        let timestamp = chrono::DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0)
            .unwrap_or_else(chrono::Utc::now);

        let mut mentions = Vec::with_capacity(msg.mentions.len());
        for user in &msg.mentions {
            let nick = match msg.guild_id {
                Some(guild_id) if resolve_members => user.nick_in(ctx, guild_id).await,
                _ => None,
            };
            mentions.push(Author {
                id: user.id.0,
                name: user.name.clone(),
                display_name: display_name(nick.as_deref(), &user.name),
            });
        }

        let author_is_admin = resolve_members && Self::author_is_admin(ctx, msg).await;

        InboundMessage {
            channel_id: msg.channel_id.0,
            author: Author {
                id: msg.author.id.0,
                name: msg.author.name.clone(),
                display_name: display_name(nick, &msg.author.name),
            },
            content: msg.content.clone(),
            timestamp,
            author_is_admin,
            mentions,
        }
    }

    async fn author_is_admin(ctx: &Context, msg: &Message) -> bool {
        let Some(guild_id) = msg.guild_id else {
            return false;
        };
        let member = match guild_id.member(ctx, msg.author.id).await {
            Ok(member) => member,
            Err(e) => {
                debug!("Could not resolve member {} in guild {guild_id}: {e}", msg.author.id);
                return false;
            }
        };
        match member.permissions(ctx) {
            Ok(perms) => perms.administrator(),
            Err(e) => {
                debug!("Could not compute permissions for {}: {e}", msg.author.id);
                false
            }
        }
    }

    fn image_data_uri(image: &Path) -> TransportResult<String> {
        let bytes = std::fs::read(image)
            .map_err(|e| TransportError::Other(anyhow::anyhow!("read {}: {e}", image.display())))?;
        let mime = match image
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/png",
        };
        Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }
}

#[async_trait]
impl ChatTransport for SerenityTransport {
    async fn self_id(&self) -> TransportResult<u64> {
        let id = self
            .self_id
            .get_or_try_init(|| async {
                let me = self.http.get_current_user().await?;
                Ok::<u64, TransportError>(me.id.0)
            })
            .await?;
        Ok(*id)
    }

    async fn send_text(&self, channel_id: u64, content: &str) -> TransportResult<u64> {
        let sent = ChannelId(channel_id).say(&self.http, content).await?;
        Ok(sent.id.0)
    }

    async fn send_with_attachment(
        &self,
        channel_id: u64,
        content: &str,
        attachment: &Path,
    ) -> TransportResult<u64> {
        let sent = ChannelId(channel_id)
            .send_message(&self.http, |m| {
                m.content(content);
                m.add_file(AttachmentType::Path(attachment));
                m
            })
            .await?;
        Ok(sent.id.0)
    }

    async fn recent_history(
        &self,
        channel_id: u64,
        limit: u64,
    ) -> TransportResult<Vec<HistoryMessage>> {
        let messages = ChannelId(channel_id)
            .messages(&self.http, |retriever| retriever.limit(limit))
            .await?;
        Ok(messages
            .into_iter()
            .map(|m| HistoryMessage {
                id: m.id.0,
                author_id: m.author.id.0,
                content: m.content,
            })
            .collect())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> TransportResult<()> {
        ChannelId(channel_id)
            .delete_message(&self.http, MessageId(message_id))
            .await?;
        Ok(())
    }

    async fn set_avatar(&self, image: &Path) -> TransportResult<()> {
        let data_uri = Self::image_data_uri(image)?;
        let mut me = self.http.get_current_user().await?;
        me.edit(&*self.http, |profile| profile.avatar(Some(data_uri.as_str())))
            .await?;
        Ok(())
    }

    async fn guild_ids(&self) -> TransportResult<Vec<u64>> {
        let guilds = self.http.get_guilds(None, None).await?;
        Ok(guilds.into_iter().map(|g| g.id.0).collect())
    }

    async fn set_nickname(&self, guild_id: u64, nickname: Option<&str>) -> TransportResult<()> {
        GuildId(guild_id)
            .edit_nickname(&self.http, nickname)
            .await?;
        Ok(())
    }

    async fn begin_blackout(&self) -> TransportResult<()> {
        self.gateway.begin_blackout().await;
        Ok(())
    }

    async fn end_blackout(&self) -> TransportResult<()> {
        self.gateway.end_blackout();
        Ok(())
    }
}

/// Guild nickname when one is set, the account name otherwise
fn display_name(nick: Option<&str>, username: &str) -> String {
    nick.filter(|n| !n.trim().is_empty())
        .unwrap_or(username)
        .to_string()
}
