//! Shared types for the front-desk call agent
//!
//! Leaf crate: conversation turn types used by the dialogue core and
//! the webhook transport. No I/O, no dependencies on other workspace
//! crates.

pub mod conversation;

pub use conversation::{Turn, TurnRole};
