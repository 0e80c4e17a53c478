//! The long-running broadcast loop.

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::features::assets::{file_name, AssetLibrary};
use crate::features::catalog::MessageCatalog;
use crate::features::cipher::CipherEngine;
use crate::features::state::{BroadcastState, StateStore};
use crate::transport::{ChatTransport, TransportError};

pub const PAUSED_BACKOFF: Duration = Duration::from_secs(10);
pub const ERROR_BACKOFF: Duration = Duration::from_secs(10);
pub const BLACKOUT_DURATION: Duration = Duration::from_secs(66);

pub const ESCALATION_CHANCE: f64 = 0.08;
pub const ATTACHMENT_CHANCE: f64 = 0.45;
pub const BLACKOUT_CHANCE: f64 = 0.01;

/// How many recent messages are scanned for the bot's own last broadcast
pub const SELF_SCAN_LIMIT: u64 = 30;

pub const ESCALATION_PHRASE: &str = "ISTO NÃO ERA PARA EXISTIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastAction {
    /// Delete the last own message and post the sentinel phrase
    Escalate,
    /// Send a catalog template with the asset at this index attached
    Attachment(usize),
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastPlan {
    pub action: BroadcastAction,
    pub blackout: bool,
}

/// Roll the dice for one iteration against a state snapshot
pub fn plan_broadcast<R: Rng + ?Sized>(
    state: &BroadcastState,
    asset_count: usize,
    rng: &mut R,
) -> BroadcastPlan {
    let action = if state.apocalypse && rng.random_bool(ESCALATION_CHANCE) {
        BroadcastAction::Escalate
    } else if asset_count > 0 && rng.random_bool(ATTACHMENT_CHANCE) {
        BroadcastAction::Attachment(rng.random_range(0..asset_count))
    } else {
        BroadcastAction::Text
    };
    let blackout = state.apocalypse && rng.random_bool(BLACKOUT_CHANCE);
    BroadcastPlan { action, blackout }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickReport {
    /// Broadcasting is disabled; nothing was sent
    Paused,
    Completed {
        plan: BroadcastPlan,
        /// Whether the payload reached the channel
        delivered: bool,
    },
}

pub struct BroadcastScheduler {
    state: Arc<StateStore>,
    catalog: Arc<MessageCatalog>,
    cipher: Arc<CipherEngine>,
    assets: AssetLibrary,
    transport: Arc<dyn ChatTransport>,
    channel_id: u64,
    blackout_duration: Duration,
}

impl BroadcastScheduler {
    pub fn new(
        state: Arc<StateStore>,
        catalog: Arc<MessageCatalog>,
        cipher: Arc<CipherEngine>,
        assets: AssetLibrary,
        transport: Arc<dyn ChatTransport>,
        channel_id: u64,
    ) -> Self {
        Self {
            state,
            catalog,
            cipher,
            assets,
            transport,
            channel_id,
            blackout_duration: BLACKOUT_DURATION,
        }
    }

    pub fn with_blackout_duration(mut self, duration: Duration) -> Self {
        self.blackout_duration = duration;
        self
    }

    /// Run until the process exits
    pub async fn run(self: Arc<Self>) {
        let mut rng = StdRng::from_os_rng();
        info!("📡 Broadcast loop started for channel {}", self.channel_id);

        loop {
            match self.tick(&mut rng).await {
                Ok(TickReport::Paused) => {
                    debug!("Broadcasting disabled; checking again in {PAUSED_BACKOFF:?}");
                    sleep(PAUSED_BACKOFF).await;
                }
                Ok(TickReport::Completed { plan, delivered }) => {
                    debug!("Broadcast iteration finished: {plan:?} (delivered={delivered})");
                    if plan.blackout {
                        self.blackout().await;
                    }
                    let wait = self.next_wait(&mut rng).await;
                    info!("⏳ Next broadcast in {}s", wait.as_secs());
                    sleep(wait).await;
                }
                Err(e) => {
                    error!("❌ Broadcast iteration failed: {e}");
                    sleep(ERROR_BACKOFF).await;
                }
            }
        }
    }

    /// Sleep before the next iteration, drawn from the state as it is now so interval and mode
    /// changes made since the last tick apply immediately
    pub async fn next_wait<R: Rng + Send>(&self, rng: &mut R) -> Duration {
        Duration::from_secs(self.state.snapshot().await.compute_wait(rng))
    }

    /// One iteration without the trailing wait
    pub async fn tick<R: Rng + Send>(&self, rng: &mut R) -> anyhow::Result<TickReport> {
        let state = self.state.snapshot().await;
        if !state.enabled {
            return Ok(TickReport::Paused);
        }

        let assets = self.assets.list();
        let plan = plan_broadcast(&state, assets.len(), rng);
        let template = self.catalog.random(rng).to_string();

        let delivered = match &plan.action {
            BroadcastAction::Escalate => self.escalate().await,
            BroadcastAction::Attachment(index) => {
                let payload = self.cipher.transform(&template);
                let asset = assets
                    .get(*index)
                    .or_else(|| assets.choose(rng))
                    .cloned();
                self.send_with_asset(&payload, asset).await
            }
            BroadcastAction::Text => {
                let payload = self.cipher.transform(&template);
                self.deliver(self.transport.send_text(self.channel_id, &payload).await)
            }
        };

        Ok(TickReport::Completed { plan, delivered })
    }

    async fn escalate(&self) -> bool {
        warn!("☢️ Escalation: replacing last transmission");
        match self.find_own_last_message().await {
            Ok(Some(message_id)) => {
                if let Err(e) = self.transport.delete_message(self.channel_id, message_id).await {
                    warn!("Could not delete own message {message_id}: {e}");
                }
            }
            Ok(None) => debug!("No own message in the last {SELF_SCAN_LIMIT} to delete"),
            Err(e) => warn!("Could not scan channel history: {e}"),
        }

        let payload = self.cipher.transform(ESCALATION_PHRASE);
        self.deliver(self.transport.send_text(self.channel_id, &payload).await)
    }

    async fn find_own_last_message(&self) -> Result<Option<u64>, TransportError> {
        let me = self.transport.self_id().await?;
        let history = self
            .transport
            .recent_history(self.channel_id, SELF_SCAN_LIMIT)
            .await?;
        Ok(history.iter().find(|m| m.author_id == me).map(|m| m.id))
    }

    async fn send_with_asset(&self, payload: &str, asset: Option<PathBuf>) -> bool {
        let result = match asset {
            Some(path) => {
                debug!("Attaching {}", file_name(&path));
                self.transport
                    .send_with_attachment(self.channel_id, payload, &path)
                    .await
            }
            None => self.transport.send_text(self.channel_id, payload).await,
        };
        self.deliver(result)
    }

    fn deliver(&self, result: Result<u64, TransportError>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) if e.is_forbidden() => {
                warn!("🚫 Missing permission to broadcast in {}: {e}", self.channel_id);
                false
            }
            Err(e) => {
                error!("❌ Broadcast send failed: {e}");
                false
            }
        }
    }

    async fn blackout(&self) {
        warn!(
            "🌑 APAGÃO: going dark for {}s",
            self.blackout_duration.as_secs()
        );
        if let Err(e) = self.transport.begin_blackout().await {
            error!("❌ Failed to close gateway for blackout: {e}");
        }
        sleep(self.blackout_duration).await;
        if let Err(e) = self.transport.end_blackout().await {
            error!("❌ Failed to resume after blackout: {e}");
        }
        info!("🌕 Blackout over, reconnecting");
    }
}
