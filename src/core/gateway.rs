//! Gateway connection lifecycle.
//!
//! Tracks the phase of the live gateway client so a blackout can shut every shard down and the
//! binary's connect loop knows whether to rebuild the client or exit.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use log::{info, warn};
use serenity::client::bridge::gateway::ShardManager;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayPhase {
    Connected,
    Blackout,
    Reconnecting,
}

#[derive(Clone)]
pub struct GatewayControl {
    phase: Arc<watch::Sender<GatewayPhase>>,
    shard_manager: Arc<Mutex<Option<Arc<Mutex<ShardManager>>>>>,
}

impl GatewayControl {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(GatewayPhase::Connected);
        Self {
            phase: Arc::new(phase),
            shard_manager: Arc::new(Mutex::new(None)),
        }
    }

    /// Register the shard manager of a freshly built client
    pub async fn attach(&self, manager: Arc<Mutex<ShardManager>>) {
        *self.shard_manager.lock().await = Some(manager);
        self.phase.send_replace(GatewayPhase::Connected);
    }

    pub fn phase(&self) -> GatewayPhase {
        *self.phase.borrow()
    }

    /// Enter blackout and shut down all shards of the attached client
    pub async fn begin_blackout(&self) {
        self.phase.send_replace(GatewayPhase::Blackout);
        let manager = self.shard_manager.lock().await.take();
        match manager {
            Some(manager) => {
                info!("🌑 Blackout: shutting down gateway shards");
                manager.lock().await.shutdown_all().await;
            }
            None => warn!("Blackout requested with no attached gateway client"),
        }
    }

    /// Leave blackout; the connect loop will rebuild the client
    pub fn end_blackout(&self) {
        self.phase.send_replace(GatewayPhase::Reconnecting);
    }

    /// Resolve once the phase is no longer `Blackout`
    pub async fn wait_until_resumable(&self) {
        let mut rx = self.phase.subscribe();
        while *rx.borrow_and_update() == GatewayPhase::Blackout {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for GatewayControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_blackout_without_client_still_changes_phase() {
        let control = GatewayControl::new();
        assert_eq!(control.phase(), GatewayPhase::Connected);

        control.begin_blackout().await;
        assert_eq!(control.phase(), GatewayPhase::Blackout);

        control.end_blackout();
        assert_eq!(control.phase(), GatewayPhase::Reconnecting);
    }

    #[tokio::test]
    async fn test_wait_until_resumable_unblocks_on_end() {
        let control = GatewayControl::new();
        control.begin_blackout().await;

        let waiter = {
            let control = control.clone();
            tokio::spawn(async move { control.wait_until_resumable().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        control.end_blackout();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }
}
