//! Dialogue policy
//!
//! The next action is a pure function of slot state. There is no
//! tracked "current step": ask for the first schema field whose fill
//! predicate is unsatisfied, complete when none is left. Filling slots
//! out of order therefore skips their questions for free.

use frontdesk_config::domain::{SlotKey, SlotSchema};

use crate::dst::LeadSlots;

/// What the agent should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Ask the caller for this field
    Ask(SlotKey),
    /// Every field is filled; close out the call
    Complete,
}

#[derive(Debug, Clone, Default)]
pub struct DialoguePolicy {
    schema: SlotSchema,
}

impl DialoguePolicy {
    pub fn new() -> Self {
        Self {
            schema: SlotSchema::new(),
        }
    }

    pub fn next_action(&self, slots: &LeadSlots) -> NextAction {
        for field in self.schema.fields() {
            let satisfied = slots
                .get(field.key)
                .map(|v| (field.validate)(v))
                .unwrap_or(false);
            if !satisfied {
                return NextAction::Ask(field.key);
            }
        }
        NextAction::Complete
    }
}
