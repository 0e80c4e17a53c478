//! # Command System
//!
//! Administrator-only prefix commands (`!alerta`, `!setinterval`, ...). Every reply goes
//! through the cipher engine.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add avatar and interval commands
//! - 1.0.0: Initial handler trait, context and registry

pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod handlers;
pub mod registry;

pub use context::CommandContext;
pub use dispatcher::{CommandDispatcher, DispatchOutcome};
pub use handler::{Invocation, PrefixCommandHandler};
pub use registry::CommandRegistry;
