// Core layer - configuration and gateway lifecycle
pub mod core;

// Features layer - cipher, state, scheduler, triggers
pub mod features;

// Chat platform boundary
pub mod transport;

// Application layer
pub mod commands;

pub use core::Config;

pub use features::{
    AssetLibrary, BroadcastScheduler, BroadcastState, CipherEngine, CipherKey, CipherVariant,
    IdentityShifter, MessageCatalog, NightLog, StateStore, TriggerDetector,
};

pub use commands::{CommandContext, CommandDispatcher};
pub use transport::{ChatTransport, InboundMessage, SerenityTransport};
