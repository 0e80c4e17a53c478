//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::features::{AssetLibrary, CipherEngine, IdentityShifter, MessageCatalog, StateStore};
use crate::transport::ChatTransport;

/// Reply sent when a command's state change could not be written to disk
pub const PERSIST_FAILURE: &str = "FALHA AO PERSISTIR ESTADO.";

/// Services every command handler can reach
#[derive(Clone)]
pub struct CommandContext {
    pub state: Arc<StateStore>,
    pub cipher: Arc<CipherEngine>,
    pub catalog: Arc<MessageCatalog>,
    pub assets: AssetLibrary,
    pub identity: IdentityShifter,
    pub transport: Arc<dyn ChatTransport>,
}

impl CommandContext {
    pub fn new(
        state: Arc<StateStore>,
        cipher: Arc<CipherEngine>,
        catalog: Arc<MessageCatalog>,
        assets: AssetLibrary,
        identity: IdentityShifter,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            state,
            cipher,
            catalog,
            assets,
            identity,
            transport,
        }
    }

    /// Send `text` through the cipher engine to `channel_id`
    pub async fn reply(&self, channel_id: u64, text: &str) -> Result<()> {
        let payload = self.cipher.transform(text);
        self.transport.send_text(channel_id, &payload).await?;
        Ok(())
    }

    /// Send a transformed caption with one file attached
    pub async fn reply_with_attachment(
        &self,
        channel_id: u64,
        caption: &str,
        attachment: &Path,
    ) -> Result<()> {
        let payload = self.cipher.transform(caption);
        self.transport
            .send_with_attachment(channel_id, &payload, attachment)
            .await?;
        Ok(())
    }
}
