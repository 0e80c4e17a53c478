//! # Feature: Broadcast Scheduler
//!
//! Single long-running loop that sends transformed catalog templates (sometimes with a media
//! attachment) to the target channel at randomized intervals. In apocalypse mode it may also
//! replace its last transmission or go dark for a blackout.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: Blackout reconnects instead of ending the process
//! - 1.1.0: Re-read interval bounds before every wait
//! - 1.0.0: Initial release

pub mod scheduler;

pub use scheduler::{
    plan_broadcast, BroadcastAction, BroadcastPlan, BroadcastScheduler, TickReport,
    ESCALATION_PHRASE,
};
