//! Heuristic slot extractor
//!
//! One matcher per field, run in schema order against the raw
//! utterance. Matchers are plain regex/keyword heuristics; anything
//! they cannot catch the caller is simply asked for again. Values are
//! checked against the field's fill predicate before being accepted,
//! so a slot never fills with text the completion test would reject.

use frontdesk_config::domain::{SlotKey, SlotSchema};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dst::LeadSlots;

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:my name is|this is)\s+([A-Z][a-z]+(?:\s[A-Z][a-z]+)*)")
        .expect("name pattern is valid")
});

/// Caller agrees to be texted on the number they are calling from
static PHONE_CONFIRM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)use (?:this|the|my) number|number (?:you'?re|you are) calling from|that'?s fine",
    )
    .expect("phone confirmation pattern is valid")
});

static PHONE_DIGITS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{3})[-.\s]?(\d{3})[-.\s]?(\d{4})\b").expect("phone digits pattern is valid")
});

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,5}\s+[\w\s.']+?\b(?:Street|St|Avenue|Ave|Road|Rd|Lane|Ln|Drive|Dr|Court|Ct|Place|Pl|Boulevard|Blvd|Terrace|Way|Hwy))\b",
    )
    .expect("address pattern is valid")
});

static ISSUE_RE: Lazy<Regex> = Lazy::new(|| {
    // Longer phrases first so "water heater" wins over "heater"
    Regex::new(
        r"(?i)\b(no hot water|water heater|leak|clog|toilet|heater|pipe|burst|drip|sink|shower|boiler)\b",
    )
    .expect("issue pattern is valid")
});

static WINDOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(tomorrow morning|tomorrow afternoon|today 2-4|today 2 to 4|2-4|2 to 4|two to four|today|tomorrow|morning|afternoon|evening)\b",
    )
    .expect("window pattern is valid")
});

type MatchFn = fn(&str, Option<&str>) -> Option<String>;

fn match_name(text: &str, _caller_id: Option<&str>) -> Option<String> {
    NAME_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// Explicit digits win over a "use this number" confirmation
fn match_phone(text: &str, caller_id: Option<&str>) -> Option<String> {
    if let Some(caps) = PHONE_DIGITS_RE.captures(text) {
        return Some(format!("{}{}{}", &caps[1], &caps[2], &caps[3]));
    }
    if PHONE_CONFIRM_RE.is_match(text) {
        return caller_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }
    None
}

fn match_address(text: &str, _caller_id: Option<&str>) -> Option<String> {
    ADDRESS_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

fn match_issue(text: &str, _caller_id: Option<&str>) -> Option<String> {
    ISSUE_RE
        .captures(text)
        .map(|caps| caps[1].to_lowercase())
}

fn match_window(text: &str, _caller_id: Option<&str>) -> Option<String> {
    WINDOW_RE
        .captures(text)
        .map(|caps| caps[1].to_lowercase())
}

/// Matchers in schema order; extraction order is stable regardless of
/// utterance wording
const MATCHERS: &[(SlotKey, MatchFn)] = &[
    (SlotKey::Name, match_name),
    (SlotKey::Phone, match_phone),
    (SlotKey::Address, match_address),
    (SlotKey::Issue, match_issue),
    (SlotKey::Window, match_window),
];

/// Regex/keyword slot extractor
#[derive(Debug, Clone, Default)]
pub struct HeuristicExtractor {
    schema: SlotSchema,
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self {
            schema: SlotSchema::new(),
        }
    }

    /// Run every matcher against one utterance, filling any still-empty
    /// slots. Returns the keys filled by this call, in schema order.
    pub fn extract(
        &self,
        slots: &mut LeadSlots,
        utterance: &str,
        caller_id: Option<&str>,
    ) -> Vec<SlotKey> {
        let mut newly_filled = Vec::new();
        for (key, matcher) in MATCHERS {
            if slots.is_filled(*key) {
                continue;
            }
            if let Some(value) = matcher(utterance, caller_id) {
                if !(self.schema.field(*key).validate)(&value) {
                    tracing::debug!(slot = %key, %value, "matched value failed fill predicate");
                    continue;
                }
                if slots.fill(*key, value) {
                    newly_filled.push(*key);
                }
            }
        }
        newly_filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(utterance: &str, caller_id: Option<&str>) -> (LeadSlots, Vec<SlotKey>) {
        let extractor = HeuristicExtractor::new();
        let mut slots = LeadSlots::new();
        let filled = extractor.extract(&mut slots, utterance, caller_id);
        (slots, filled)
    }

    #[test]
    fn test_name_from_introduction() {
        let (slots, filled) = extract("Hi, this is Dana Smith", None);
        assert_eq!(slots.get(SlotKey::Name), Some("Dana Smith"));
        assert_eq!(filled, vec![SlotKey::Name]);
    }

    #[test]
    fn test_name_requires_capitalized_word() {
        let (slots, _) = extract("this is the third time I'm calling", None);
        assert_eq!(slots.get(SlotKey::Name), None);
    }

    #[test]
    fn test_phone_from_spoken_digits() {
        let (slots, _) = extract("you can reach me at 555-123-4567", None);
        assert_eq!(slots.get(SlotKey::Phone), Some("5551234567"));
    }

    #[test]
    fn test_phone_confirmation_uses_caller_id() {
        let (slots, _) = extract("just use the number you're calling from", Some("+15551234567"));
        assert_eq!(slots.get(SlotKey::Phone), Some("+15551234567"));
    }

    #[test]
    fn test_phone_confirmation_without_caller_id_fills_nothing() {
        let (slots, filled) = extract("use this number", None);
        assert_eq!(slots.get(SlotKey::Phone), None);
        assert!(filled.is_empty());
    }

    #[test]
    fn test_explicit_digits_beat_confirmation_phrase() {
        let (slots, _) = extract(
            "that's fine, but better use 555 987 6543",
            Some("+15551234567"),
        );
        assert_eq!(slots.get(SlotKey::Phone), Some("5559876543"));
    }

    #[test]
    fn test_address_with_street_token() {
        let (slots, _) = extract("I'm at 123 Oak Street in Hempstead", None);
        assert_eq!(slots.get(SlotKey::Address), Some("123 Oak Street"));
    }

    #[test]
    fn test_address_without_street_token_rejected() {
        let (slots, _) = extract("I live at 123 somewhere around here", None);
        assert_eq!(slots.get(SlotKey::Address), None);
    }

    #[test]
    fn test_issue_prefers_longer_phrase() {
        let (slots, _) = extract("our water heater is busted", None);
        assert_eq!(slots.get(SlotKey::Issue), Some("water heater"));
    }

    #[test]
    fn test_issue_keyword() {
        let (slots, _) = extract("there's a LEAK under the sink", None);
        assert_eq!(slots.get(SlotKey::Issue), Some("leak"));
    }

    #[test]
    fn test_window_keyword() {
        let (slots, _) = extract("Tomorrow morning works best", None);
        assert_eq!(slots.get(SlotKey::Window), Some("tomorrow morning"));
    }

    #[test]
    fn test_multiple_slots_in_one_utterance() {
        let (slots, filled) = extract(
            "Hi, this is Dana, I have no hot water at 9 Willow Ln, today 2 to 4 works",
            None,
        );
        assert_eq!(slots.get(SlotKey::Name), Some("Dana"));
        assert_eq!(slots.get(SlotKey::Issue), Some("no hot water"));
        assert_eq!(slots.get(SlotKey::Address), Some("9 Willow Ln"));
        assert_eq!(slots.get(SlotKey::Window), Some("today 2 to 4"));
        assert_eq!(
            filled,
            vec![SlotKey::Name, SlotKey::Address, SlotKey::Issue, SlotKey::Window]
        );
    }

    #[test]
    fn test_filled_slot_is_never_overwritten() {
        let extractor = HeuristicExtractor::new();
        let mut slots = LeadSlots::new();
        extractor.extract(&mut slots, "this is Dana", None);
        let filled = extractor.extract(&mut slots, "no wait, this is Alex", None);
        assert_eq!(slots.get(SlotKey::Name), Some("Dana"));
        assert!(filled.is_empty());
    }

    #[test]
    fn test_unrelated_utterance_fills_nothing() {
        let (slots, filled) = extract("how much do you charge for a visit?", None);
        assert!(filled.is_empty());
        assert_eq!(slots.filled_count(), 0);
    }
}
