//! Domain configuration
//!
//! The slot schema and all prompt text for the front-desk domain.
//! Everything here is data: the dialogue core reads it, never edits it.

pub mod prompts;
pub mod schema;

pub use prompts::DomainPrompts;
pub use schema::{FieldSpec, SlotKey, SlotSchema};
