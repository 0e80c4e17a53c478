//! # Feature: State Store
//!
//! Process-wide broadcast configuration (apocalypse flag, enabled switch, interval bounds),
//! persisted as JSON and rewritten atomically on every mutation.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Normalize out-of-range interval bounds on load
//! - 1.1.0: Per-key interval backfill for older state files
//! - 1.0.0: Initial release

pub mod store;

pub use store::{
    validate_interval, BroadcastState, IntervalError, IntervalMode, Intervals, StateStore,
};
