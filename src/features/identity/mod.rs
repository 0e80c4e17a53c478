//! # Feature: Identity Shift
//!
//! Cosmetic side effect of entering or leaving apocalypse mode: swap the avatar to the first
//! `avatar*` asset and rename the bot in every guild. All failures are logged and discarded.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use log::{debug, error, info};
use rand::seq::IndexedRandom;
use std::path::Path;
use std::sync::Arc;

use crate::features::assets::AssetLibrary;
use crate::transport::ChatTransport;

pub const APOCALYPSE_NICKNAMES: &[&str] = &["TRANSMISSÃO CORROMPIDA", "ELE_VEM", "SINAL_PERDIDO"];

#[derive(Clone)]
pub struct IdentityShifter {
    transport: Arc<dyn ChatTransport>,
    assets: AssetLibrary,
}

impl IdentityShifter {
    pub fn new(transport: Arc<dyn ChatTransport>, assets: AssetLibrary) -> Self {
        Self { transport, assets }
    }

    /// Apply the apocalypse identity (`true`) or restore the default nickname (`false`).
    ///
    /// The avatar is only changed when entering apocalypse mode.
    pub async fn shift(&self, apocalypse_on: bool) {
        if apocalypse_on {
            if let Some(avatar) = self.assets.avatars().first() {
                self.update_avatar(avatar).await;
            }
        }

        let guilds = match self.transport.guild_ids().await {
            Ok(guilds) => guilds,
            Err(e) => {
                error!("❌ Failed to list guilds for nickname change: {e}");
                return;
            }
        };

        for guild_id in guilds {
            let nickname = if apocalypse_on {
                APOCALYPSE_NICKNAMES.choose(&mut rand::rng()).copied()
            } else {
                None
            };
            if let Err(e) = self.transport.set_nickname(guild_id, nickname).await {
                debug!("Could not edit nickname in guild {guild_id}: {e}");
            }
        }
    }

    /// Replace the avatar; returns whether the platform accepted it
    pub async fn update_avatar(&self, image: &Path) -> bool {
        match self.transport.set_avatar(image).await {
            Ok(()) => {
                info!("🖼️ Avatar updated to {}", image.display());
                true
            }
            Err(e) => {
                error!("❌ Failed to update avatar to {}: {e}", image.display());
                false
            }
        }
    }
}
