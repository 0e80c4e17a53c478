//! # Features Layer
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

pub mod assets;
pub mod broadcast;
pub mod catalog;
pub mod cipher;
pub mod identity;
pub mod state;
pub mod triggers;

pub use assets::AssetLibrary;
pub use broadcast::BroadcastScheduler;
pub use catalog::MessageCatalog;
pub use cipher::{CipherEngine, CipherKey, CipherVariant};
pub use identity::IdentityShifter;
pub use state::{BroadcastState, StateStore};
pub use triggers::{NightLog, TriggerDetector};
