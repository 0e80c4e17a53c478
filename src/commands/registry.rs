//! Command handler registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

use super::handler::PrefixCommandHandler;

/// Lookup from chat command name to the handler that owns it
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn PrefixCommandHandler>>,
}

impl CommandRegistry {
    pub fn with_handlers(handlers: impl IntoIterator<Item = Arc<dyn PrefixCommandHandler>>) -> Self {
        let mut registry = Self::default();
        for handler in handlers {
            registry.register(handler);
        }
        registry
    }

    /// Claim every name the handler answers to. A name that is already taken moves to the new
    /// handler.
    pub fn register(&mut self, handler: Arc<dyn PrefixCommandHandler>) {
        for name in handler.command_names() {
            if self.handlers.insert(name, Arc::clone(&handler)).is_some() {
                warn!("Command '{name}' registered twice; keeping the later handler");
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn PrefixCommandHandler>> {
        self.handlers.get(name)
    }
}
