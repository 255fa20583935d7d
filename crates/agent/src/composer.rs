//! Reply composer
//!
//! Turns a policy decision into a spoken line. Two strategies:
//!
//! - scripted: the canned prompt for the pending field, nothing else
//! - assisted: ask the generative-text collaborator to phrase the turn,
//!   falling back to the scripted line on error, timeout, or an empty
//!   completion
//!
//! Either way the composer returns non-empty text. The collaborator
//! only ever phrases; which field to ask and when to close are decided
//! upstream and never delegated.

use std::sync::Arc;
use std::time::Duration;

use frontdesk_config::domain::{DomainPrompts, SlotSchema};
use frontdesk_config::settings::ComposerStrategy;
use frontdesk_llm::backend::ChatBackend;
use frontdesk_llm::prompt::PromptBuilder;

use crate::policy::NextAction;
use crate::session::CallSession;

pub struct ReplyComposer {
    strategy: ComposerStrategy,
    backend: Option<Arc<dyn ChatBackend>>,
    schema: SlotSchema,
    prompts: DomainPrompts,
    timeout: Duration,
}

impl ReplyComposer {
    /// Canned prompts only; no collaborator involved
    pub fn scripted(prompts: DomainPrompts) -> Self {
        Self {
            strategy: ComposerStrategy::Scripted,
            backend: None,
            schema: SlotSchema::new(),
            prompts,
            timeout: Duration::ZERO,
        }
    }

    /// Collaborator-phrased turns with scripted fallback
    pub fn assisted(
        prompts: DomainPrompts,
        backend: Arc<dyn ChatBackend>,
        timeout: Duration,
    ) -> Self {
        Self {
            strategy: ComposerStrategy::Assisted,
            backend: Some(backend),
            schema: SlotSchema::new(),
            prompts,
            timeout,
        }
    }

    pub fn strategy(&self) -> ComposerStrategy {
        self.strategy
    }

    pub fn prompts(&self) -> &DomainPrompts {
        &self.prompts
    }

    /// The canned line for an action
    pub fn scripted_line(&self, action: &NextAction) -> String {
        match action {
            NextAction::Ask(key) => self.schema.field(*key).prompt.to_string(),
            NextAction::Complete => self.prompts.closing.clone(),
        }
    }

    /// Line spoken on a silent turn. Deterministic: a brand-new call
    /// gets the greeting plus the first question, an in-progress call
    /// gets the pending question again.
    pub fn silence_line(&self, is_new_call: bool, action: &NextAction) -> String {
        match action {
            NextAction::Ask(_) if is_new_call => {
                format!("{} {}", self.prompts.greeting, self.scripted_line(action))
            }
            _ => self.scripted_line(action),
        }
    }

    /// Compose the reply for one turn; never returns empty text
    pub async fn compose(&self, session: &CallSession, action: &NextAction) -> String {
        let say = match self.strategy {
            ComposerStrategy::Scripted => self.scripted_line(action),
            ComposerStrategy::Assisted => match &self.backend {
                Some(backend) => self.compose_assisted(backend, session, action).await,
                None => self.scripted_line(action),
            },
        };
        if say.trim().is_empty() {
            return self.prompts.fallback.clone();
        }
        say
    }

    async fn compose_assisted(
        &self,
        backend: &Arc<dyn ChatBackend>,
        session: &CallSession,
        action: &NextAction,
    ) -> String {
        let messages = PromptBuilder::new()
            .with_system(self.prompts.system_instruction())
            .with_transcript(&session.transcript)
            .with_context(self.turn_context(session, action))
            .build();

        match tokio::time::timeout(self.timeout, backend.generate(&messages)).await {
            Ok(Ok(result)) if !result.text.trim().is_empty() => result.text.trim().to_string(),
            Ok(Ok(_)) => {
                tracing::warn!(call_id = %session.call_id, "empty completion, using scripted line");
                self.scripted_line(action)
            }
            Ok(Err(e)) => {
                tracing::warn!(call_id = %session.call_id, error = %e, "composer falling back to scripted line");
                self.scripted_line(action)
            }
            Err(_) => {
                tracing::warn!(
                    call_id = %session.call_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "composer timed out, using scripted line"
                );
                self.scripted_line(action)
            }
        }
    }

    fn turn_context(&self, session: &CallSession, action: &NextAction) -> String {
        let last = session.last_user_utterance().unwrap_or("");
        match action {
            NextAction::Ask(key) => format!(
                "Known so far: {}. Caller just said: \"{}\". \
                 In one short sentence, acknowledge and ask for their {}.",
                session.slots.to_context_string(),
                last,
                key,
            ),
            NextAction::Complete => format!(
                "All details are captured: {}. Caller just said: \"{}\". \
                 Confirm the booking back in one short sentence and say \
                 \"You'll receive a text confirmation shortly.\"",
                session.slots.to_context_string(),
                last,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use frontdesk_config::domain::SlotKey;
    use frontdesk_llm::backend::GenerationResult;
    use frontdesk_llm::prompt::Message;
    use frontdesk_llm::LlmError;
    use std::time::Instant;

    struct FixedBackend(&'static str);

    #[async_trait]
    impl ChatBackend for FixedBackend {
        async fn generate(&self, _messages: &[Message]) -> Result<GenerationResult, LlmError> {
            Ok(GenerationResult {
                text: self.0.to_string(),
                total_time_ms: 1,
            })
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        async fn generate(&self, _messages: &[Message]) -> Result<GenerationResult, LlmError> {
            Err(LlmError::Api("boom".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    fn session() -> CallSession {
        let now = Instant::now();
        CallSession {
            call_id: "CA1".to_string(),
            caller_number: None,
            slots: crate::dst::LeadSlots::new(),
            transcript: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    #[tokio::test]
    async fn test_scripted_uses_field_prompt() {
        let composer = ReplyComposer::scripted(DomainPrompts::default());
        let say = composer.compose(&session(), &NextAction::Ask(SlotKey::Name)).await;
        assert_eq!(say, "May I have your name, please?");
    }

    #[tokio::test]
    async fn test_scripted_complete_uses_closing() {
        let composer = ReplyComposer::scripted(DomainPrompts::default());
        let say = composer.compose(&session(), &NextAction::Complete).await;
        assert!(say.contains("text confirmation"));
    }

    #[tokio::test]
    async fn test_assisted_uses_backend_text() {
        let composer = ReplyComposer::assisted(
            DomainPrompts::default(),
            Arc::new(FixedBackend("Of course! And your name?")),
            Duration::from_secs(1),
        );
        let say = composer.compose(&session(), &NextAction::Ask(SlotKey::Name)).await;
        assert_eq!(say, "Of course! And your name?");
    }

    #[tokio::test]
    async fn test_assisted_falls_back_on_error() {
        let composer = ReplyComposer::assisted(
            DomainPrompts::default(),
            Arc::new(FailingBackend),
            Duration::from_secs(1),
        );
        let say = composer
            .compose(&session(), &NextAction::Ask(SlotKey::Address))
            .await;
        assert_eq!(say, "Thanks. What's the service address?");
    }

    #[tokio::test]
    async fn test_assisted_falls_back_on_blank_completion() {
        let composer = ReplyComposer::assisted(
            DomainPrompts::default(),
            Arc::new(FixedBackend("   ")),
            Duration::from_secs(1),
        );
        let say = composer.compose(&session(), &NextAction::Ask(SlotKey::Name)).await;
        assert_eq!(say, "May I have your name, please?");
    }

    #[test]
    fn test_silence_line_greets_only_new_calls() {
        let composer = ReplyComposer::scripted(DomainPrompts::default());
        let fresh = composer.silence_line(true, &NextAction::Ask(SlotKey::Name));
        assert!(fresh.starts_with("Mike's Plumbing"));
        assert!(fresh.contains("your name"));

        let repeat = composer.silence_line(false, &NextAction::Ask(SlotKey::Name));
        assert_eq!(repeat, "May I have your name, please?");
    }
}
