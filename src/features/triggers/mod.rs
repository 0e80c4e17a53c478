//! # Feature: Trigger Detector
//!
//! Inspects every inbound message not written by the bot. Late-night messages are appended to
//! the night log; messages containing a trigger phrase escalate into apocalypse mode.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Persist the escalation immediately
//! - 1.0.0: Initial release with night log and trigger phrases

pub mod night_log;

use log::{debug, info, warn};
use std::sync::Arc;

use crate::features::cipher::CipherEngine;
use crate::features::identity::IdentityShifter;
use crate::features::state::StateStore;
use crate::transport::{ChatTransport, InboundMessage};

pub use night_log::NightLog;

pub const TRIGGER_PHRASES: &[&str] = &[
    "ele",
    "medo",
    "olhos",
    "onde você está",
    "estou com medo",
    "socorro",
];

pub const TRIGGER_REPLY: &str = "O DIA DA TRANSMISSÃO ESTÁ PRÓXIMO.";

/// Case-insensitive substring match against the trigger phrases
pub fn contains_trigger(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TRIGGER_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub night_logged: bool,
    pub escalated: bool,
}

pub struct TriggerDetector {
    state: Arc<StateStore>,
    cipher: Arc<CipherEngine>,
    identity: IdentityShifter,
    transport: Arc<dyn ChatTransport>,
    night_log: NightLog,
}

impl TriggerDetector {
    pub fn new(
        state: Arc<StateStore>,
        cipher: Arc<CipherEngine>,
        identity: IdentityShifter,
        transport: Arc<dyn ChatTransport>,
        night_log: NightLog,
    ) -> Self {
        Self {
            state,
            cipher,
            identity,
            transport,
            night_log,
        }
    }

    pub async fn inspect(&self, msg: &InboundMessage) -> TriggerOutcome {
        let night_logged = self.night_log.record(msg);

        if !contains_trigger(&msg.content) {
            return TriggerOutcome {
                night_logged,
                escalated: false,
            };
        }

        info!(
            "🔥 Trigger phrase from {} in channel {} - escalating",
            msg.author.name, msg.channel_id
        );
        if let Err(e) = self.state.set_apocalypse(true).await {
            warn!("Escalation not persisted: {e}");
        }
        self.identity.shift(true).await;

        let reply = self.cipher.transform(TRIGGER_REPLY);
        if let Err(e) = self.transport.send_text(msg.channel_id, &reply).await {
            debug!("Trigger reply not delivered: {e}");
        }

        TriggerOutcome {
            night_logged,
            escalated: true,
        }
    }
}
