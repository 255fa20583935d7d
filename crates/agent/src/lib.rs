//! Conversation state machine and slot-extraction engine
//!
//! The only crate with real decision logic:
//! - `dst` — per-call slot-fill state and the heuristic extractor
//! - `policy` — next-question / completion decisions from slot state
//! - `composer` — scripted or collaborator-assisted reply phrasing
//! - `session` — in-memory per-call session store with idle eviction
//! - `orchestrator` — the per-turn handler tying the above together
//!
//! Everything upstream (speech transport, webhook framing) and
//! downstream (SMS dispatch) is a collaborator behind a narrow
//! interface; nothing in this crate is fatal to the process.

pub mod composer;
pub mod dst;
pub mod orchestrator;
pub mod policy;
pub mod session;

pub use composer::ReplyComposer;
pub use dst::{HeuristicExtractor, LeadSlots};
pub use orchestrator::{CallOrchestrator, Directive, TurnRequest, TurnResponse};
pub use policy::{DialoguePolicy, NextAction};
pub use session::{CallSession, SessionStore};
