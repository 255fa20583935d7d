//! Dialogue state tracking
//!
//! `LeadSlots` holds what the caller has told us so far; the
//! `HeuristicExtractor` opportunistically fills it from each
//! utterance. Both are deterministic and I/O-free.

pub mod extractor;
pub mod slots;

pub use extractor::HeuristicExtractor;
pub use slots::LeadSlots;
