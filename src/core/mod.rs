//! # Core Module
//!
//! Configuration and gateway lifecycle shared by the binary and the features layer.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add gateway module for blackout reconnect handling
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod gateway;

pub use config::Config;
pub use gateway::{GatewayControl, GatewayPhase};
