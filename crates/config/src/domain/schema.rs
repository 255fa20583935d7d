//! Slot schema
//!
//! The ordered set of facts to collect from a caller, with one fill
//! predicate per field. Field order defines the default question
//! sequence; the completion test derives from the same list, so there
//! is exactly one source of truth for both.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A fact to collect from the caller, in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    /// Caller name
    Name,
    /// Callback number
    Phone,
    /// Service address
    Address,
    /// Issue summary
    Issue,
    /// Appointment window
    Window,
}

impl SlotKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKey::Name => "name",
            SlotKey::Phone => "phone",
            SlotKey::Address => "address",
            SlotKey::Issue => "issue",
            SlotKey::Window => "window",
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One field of the schema: what to ask and when it counts as filled
#[derive(Clone)]
pub struct FieldSpec {
    /// Which slot this field fills
    pub key: SlotKey,
    /// Canned question for this field
    pub prompt: &'static str,
    /// Fill predicate; a value failing this does not satisfy the field
    pub validate: fn(&str) -> bool,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("prompt", &self.prompt)
            .finish()
    }
}

static STREET_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:Street|St|Avenue|Ave|Road|Rd|Lane|Ln|Drive|Dr|Court|Ct|Place|Pl|Boulevard|Blvd|Terrace|Way|Hwy)\b",
    )
    .expect("street type pattern is valid")
});

fn non_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// An address counts as filled only when it carries a street-type token
fn looks_like_address(value: &str) -> bool {
    non_empty(value) && STREET_TYPE.is_match(value)
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: SlotKey::Name,
        prompt: "May I have your name, please?",
        validate: non_empty,
    },
    FieldSpec {
        key: SlotKey::Phone,
        prompt: "For the text confirmation, should I use the number you're calling from, \
                 or is there a better one?",
        validate: non_empty,
    },
    FieldSpec {
        key: SlotKey::Address,
        prompt: "Thanks. What's the service address?",
        validate: looks_like_address,
    },
    FieldSpec {
        key: SlotKey::Issue,
        prompt: "Thank you. What seems to be the issue?",
        validate: non_empty,
    },
    FieldSpec {
        key: SlotKey::Window,
        prompt: "When would you like the technician to arrive? \
                 We have today 2 to 4 PM, or tomorrow morning.",
        validate: non_empty,
    },
];

/// The front-desk slot schema
#[derive(Debug, Clone, Default)]
pub struct SlotSchema;

impl SlotSchema {
    pub fn new() -> Self {
        Self
    }

    /// Ordered field specs; order is the default question sequence
    pub fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    /// Look up the spec for one field
    pub fn field(&self, key: SlotKey) -> &'static FieldSpec {
        FIELDS
            .iter()
            .find(|f| f.key == key)
            .expect("every slot key has a field spec")
    }

    /// True iff every field's fill predicate is satisfied
    pub fn is_complete(&self, value_of: impl Fn(SlotKey) -> Option<String>) -> bool {
        FIELDS
            .iter()
            .all(|f| value_of(f.key).map(|v| (f.validate)(&v)).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_is_question_order() {
        let schema = SlotSchema::new();
        let keys: Vec<SlotKey> = schema.fields().iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            vec![
                SlotKey::Name,
                SlotKey::Phone,
                SlotKey::Address,
                SlotKey::Issue,
                SlotKey::Window
            ]
        );
    }

    #[test]
    fn test_address_predicate_requires_street_token() {
        let schema = SlotSchema::new();
        let address = schema.field(SlotKey::Address);
        assert!((address.validate)("123 Oak Street"));
        assert!((address.validate)("9 Willow Ln"));
        assert!(!(address.validate)("somewhere on the island"));
        assert!(!(address.validate)(""));
    }

    #[test]
    fn test_non_empty_predicates() {
        let schema = SlotSchema::new();
        assert!((schema.field(SlotKey::Name).validate)("Dana"));
        assert!(!(schema.field(SlotKey::Name).validate)("   "));
    }

    #[test]
    fn test_is_complete() {
        let schema = SlotSchema::new();
        assert!(!schema.is_complete(|_| None));
        assert!(!schema.is_complete(|k| match k {
            SlotKey::Address => Some("no street token here".to_string()),
            _ => Some("x".to_string()),
        }));
        assert!(schema.is_complete(|k| match k {
            SlotKey::Address => Some("123 Oak Street".to_string()),
            _ => Some("x".to_string()),
        }));
    }
}
