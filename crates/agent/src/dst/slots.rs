//! Per-call slot-fill state
//!
//! Fill-once semantics: the first accepted value for a slot sticks for
//! the life of the call. Corrections are out of scope; re-fills are
//! rejected structurally rather than by caller discipline.

use frontdesk_config::domain::SlotKey;
use serde::{Deserialize, Serialize};

/// What the caller has told us so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSlots {
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    issue: Option<String>,
    window: Option<String>,
}

impl LeadSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of one slot
    pub fn get(&self, key: SlotKey) -> Option<&str> {
        match key {
            SlotKey::Name => self.name.as_deref(),
            SlotKey::Phone => self.phone.as_deref(),
            SlotKey::Address => self.address.as_deref(),
            SlotKey::Issue => self.issue.as_deref(),
            SlotKey::Window => self.window.as_deref(),
        }
    }

    pub fn is_filled(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    /// Fill a slot if it is still empty. Returns whether the value was
    /// accepted; an already-filled slot keeps its first value.
    pub fn fill(&mut self, key: SlotKey, value: impl Into<String>) -> bool {
        let target = match key {
            SlotKey::Name => &mut self.name,
            SlotKey::Phone => &mut self.phone,
            SlotKey::Address => &mut self.address,
            SlotKey::Issue => &mut self.issue,
            SlotKey::Window => &mut self.window,
        };
        if target.is_some() {
            return false;
        }
        *target = Some(value.into());
        true
    }

    /// Number of filled slots
    pub fn filled_count(&self) -> usize {
        [
            SlotKey::Name,
            SlotKey::Phone,
            SlotKey::Address,
            SlotKey::Issue,
            SlotKey::Window,
        ]
        .iter()
        .filter(|k| self.is_filled(**k))
        .count()
    }

    /// Keys still missing, in schema order
    pub fn missing(&self) -> Vec<SlotKey> {
        [
            SlotKey::Name,
            SlotKey::Phone,
            SlotKey::Address,
            SlotKey::Issue,
            SlotKey::Window,
        ]
        .iter()
        .copied()
        .filter(|k| !self.is_filled(*k))
        .collect()
    }

    /// One-line state summary for collaborator context
    pub fn to_context_string(&self) -> String {
        format!(
            "name={}, phone={}, address={}, issue={}, window={}",
            self.name.as_deref().unwrap_or("?"),
            self.phone.as_deref().unwrap_or("?"),
            self.address.as_deref().unwrap_or("?"),
            self.issue.as_deref().unwrap_or("?"),
            self.window.as_deref().unwrap_or("?"),
        )
    }
}
