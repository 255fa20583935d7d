//! Prompt text for the front-desk domain
//!
//! Canned lines spoken by the scripted composer, plus the system
//! instruction handed to the generative-text collaborator. The
//! greeting wording is a business requirement and must not drift.

use serde::{Deserialize, Serialize};

/// All spoken prompt text, overridable from configuration files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainPrompts {
    /// Business name used in the greeting and lead summaries
    #[serde(default = "default_business_name")]
    pub business_name: String,

    /// Opening line for a brand-new call
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Closing line once every slot is filled
    #[serde(default = "default_closing")]
    pub closing: String,

    /// Spoken when a turn could not be understood or composed
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_business_name() -> String {
    "Mike's Plumbing".to_string()
}

fn default_greeting() -> String {
    "Mike's Plumbing – how can I help you today?".to_string()
}

fn default_closing() -> String {
    "You'll receive a text confirmation shortly. Thank you for calling Mike's Plumbing."
        .to_string()
}

fn default_fallback() -> String {
    "Sorry, could you repeat that?".to_string()
}

impl Default for DomainPrompts {
    fn default() -> Self {
        Self {
            business_name: default_business_name(),
            greeting: default_greeting(),
            closing: default_closing(),
            fallback: default_fallback(),
        }
    }
}

impl DomainPrompts {
    /// System instruction for the generative-text collaborator.
    ///
    /// Persona, required fields, pricing-disclosure policy, and the
    /// exact greeting wording. The collaborator phrases questions; it
    /// never decides completion.
    pub fn system_instruction(&self) -> String {
        format!(
            "You are the virtual receptionist for \"{name}\" on Long Island (Nassau/Suffolk). \
             Your greeting must be exactly: \"{greeting}\" \
             Your job: quickly and politely collect the caller's NAME, CALLBACK NUMBER, \
             SERVICE ADDRESS, ISSUE SUMMARY, and an APPOINTMENT WINDOW (offer today 2-4 PM \
             or tomorrow morning). Pricing anchors: inspection $79 (applied to the job); a \
             standard tank water-heater replacement locally runs $2,000-$3,000 depending on \
             size and fuel type. If asked about prices, share the anchors and note that the \
             exact quote is given on-site after inspection. \
             Ask: \"For the text confirmation, should I use the number you're calling from, \
             or is there a better one?\" \
             Be concise, warm, and confident. Confirm details back before finishing. When \
             all info is captured, say \"You'll receive a text confirmation shortly.\" \
             Then end the call.",
            name = self.business_name,
            greeting = self.greeting,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_wording_is_exact() {
        let prompts = DomainPrompts::default();
        assert_eq!(prompts.greeting, "Mike's Plumbing – how can I help you today?");
    }

    #[test]
    fn test_system_instruction_carries_greeting_and_pricing() {
        let prompts = DomainPrompts::default();
        let instruction = prompts.system_instruction();
        assert!(instruction.contains(&prompts.greeting));
        assert!(instruction.contains("$79"));
        assert!(instruction.contains("APPOINTMENT WINDOW"));
    }

    #[test]
    fn test_fallback_is_non_empty() {
        assert!(!DomainPrompts::default().fallback.is_empty());
    }
}
