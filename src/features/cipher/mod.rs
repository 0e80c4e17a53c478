//! # Feature: Cipher Engine
//!
//! Eight text transforms applied to every outgoing payload, picked uniformly at random per call.
//! The sealed variant is XChaCha20-Poly1305 keyed by a key persisted next to the state file.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod engine;
pub mod key;

pub use engine::{CipherEngine, CipherVariant};
pub use key::CipherKey;
