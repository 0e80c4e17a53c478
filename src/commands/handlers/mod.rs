//! Per-command handler implementations
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Add AvatarHandler and IntervalHandler
//! - 1.0.0: ModeHandler, CorruptHandler, MediaHandler

pub mod avatar;
pub mod corrupt;
pub mod interval;
pub mod media;
pub mod mode;

use std::sync::Arc;

use super::handler::PrefixCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn PrefixCommandHandler>> {
    vec![
        Arc::new(mode::ModeHandler),
        Arc::new(corrupt::CorruptHandler),
        Arc::new(media::MediaHandler),
        Arc::new(avatar::AvatarHandler),
        Arc::new(interval::IntervalHandler),
    ]
}
