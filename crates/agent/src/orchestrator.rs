//! Per-turn call orchestration
//!
//! One entry point, `handle_turn`, driven by the webhook layer:
//! extract slots from the utterance, decide the next action, compose
//! the reply, and on completion hand the lead off and delete the
//! session. Session mutation happens synchronously under the store
//! lock; composition and notification run on a cloned snapshot.

use std::sync::Arc;
use std::time::Duration;

use frontdesk_core::conversation::Turn;
use frontdesk_notify::{LeadRecord, Notifier};

use frontdesk_config::domain::SlotKey;

use crate::composer::ReplyComposer;
use crate::dst::HeuristicExtractor;
use crate::policy::{DialoguePolicy, NextAction};
use crate::session::SessionStore;

/// One inbound webhook turn
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Transport call id; the session key
    pub call_id: String,
    /// Inbound caller id, when the transport supplied one
    pub caller_number: Option<String>,
    /// Transcribed caller speech; `None` or blank means silence
    pub utterance: Option<String>,
}

/// What the transport should do after speaking the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Speak and listen for the next utterance
    Continue,
    /// Speak and hang up
    End,
}

/// Reply for one turn
#[derive(Debug, Clone)]
pub struct TurnResponse {
    /// Text to speak to the caller; never empty
    pub say: String,
    pub directive: Directive,
}

pub struct CallOrchestrator {
    extractor: HeuristicExtractor,
    policy: DialoguePolicy,
    composer: ReplyComposer,
    sessions: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    notify_timeout: Duration,
}

impl CallOrchestrator {
    pub fn new(
        composer: ReplyComposer,
        sessions: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            extractor: HeuristicExtractor::new(),
            policy: DialoguePolicy::new(),
            composer,
            sessions,
            notifier,
            notify_timeout,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn composer_strategy(&self) -> frontdesk_config::settings::ComposerStrategy {
        self.composer.strategy()
    }

    /// Handle one webhook turn
    pub async fn handle_turn(&self, request: TurnRequest) -> TurnResponse {
        let utterance = request
            .utterance
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        match utterance {
            None => self.handle_silence(&request),
            Some(text) => self.handle_utterance(&request, text).await,
        }
    }

    /// Silence never advances or rewinds the dialogue: same slot state
    /// in, same prompt out, every time.
    fn handle_silence(&self, request: &TurnRequest) -> TurnResponse {
        let (is_new_call, action) = self.sessions.with_session(
            &request.call_id,
            request.caller_number.as_deref(),
            |session| (session.transcript.is_empty(), self.policy.next_action(&session.slots)),
        );

        if action == NextAction::Complete {
            // Completion deletes the session in the same turn, so a
            // complete state on silence means something upstream
            // replayed stale traffic. Close politely without a lead.
            tracing::warn!(call_id = %request.call_id, "silent turn on completed state");
            self.sessions.remove(&request.call_id);
            return TurnResponse {
                say: self.composer.scripted_line(&NextAction::Complete),
                directive: Directive::End,
            };
        }

        tracing::debug!(call_id = %request.call_id, is_new_call, "silent turn, re-prompting");
        TurnResponse {
            say: self.composer.silence_line(is_new_call, &action),
            directive: Directive::Continue,
        }
    }

    async fn handle_utterance(&self, request: &TurnRequest, text: &str) -> TurnResponse {
        // Mutate under the lock, then release it before any await
        let (snapshot, action, newly_filled) = self.sessions.with_session(
            &request.call_id,
            request.caller_number.as_deref(),
            |session| {
                session.append(Turn::user(text));
                let newly_filled = self.extractor.extract(
                    &mut session.slots,
                    text,
                    session.caller_number.as_deref(),
                );
                let action = self.policy.next_action(&session.slots);
                (session.clone(), action, newly_filled)
            },
        );

        if !newly_filled.is_empty() {
            tracing::info!(
                call_id = %request.call_id,
                filled = ?newly_filled.iter().map(SlotKey::as_str).collect::<Vec<_>>(),
                total = snapshot.slots.filled_count(),
                "slots filled"
            );
        }

        let say = self.composer.compose(&snapshot, &action).await;

        match action {
            NextAction::Ask(_) => {
                self.sessions
                    .with_session(&request.call_id, None, |session| {
                        session.append(Turn::assistant(&say));
                    });
                TurnResponse {
                    say,
                    directive: Directive::Continue,
                }
            }
            NextAction::Complete => {
                self.dispatch_lead(&snapshot).await;
                self.sessions.remove(&request.call_id);
                tracing::info!(call_id = %request.call_id, "call completed, session deleted");
                TurnResponse {
                    say,
                    directive: Directive::End,
                }
            }
        }
    }

    /// Hand the finished lead to the notifier. Bounded and best-effort:
    /// a dispatch failure is logged and the call still ends cleanly.
    async fn dispatch_lead(&self, session: &crate::session::CallSession) {
        let value = |key| {
            session
                .slots
                .get(key)
                .unwrap_or_default()
                .to_string()
        };
        let lead = LeadRecord {
            name: value(SlotKey::Name),
            phone: value(SlotKey::Phone),
            address: value(SlotKey::Address),
            issue: value(SlotKey::Issue),
            window: value(SlotKey::Window),
            caller_id: session.caller_number.clone(),
        };

        match tokio::time::timeout(self.notify_timeout, self.notifier.notify(&lead)).await {
            Ok(Ok(())) => {
                tracing::info!(
                    call_id = %session.call_id,
                    channel = self.notifier.channel(),
                    "lead dispatched"
                );
            }
            Ok(Err(e)) => {
                tracing::error!(
                    call_id = %session.call_id,
                    channel = self.notifier.channel(),
                    error = %e,
                    "lead dispatch failed"
                );
            }
            Err(_) => {
                tracing::error!(
                    call_id = %session.call_id,
                    channel = self.notifier.channel(),
                    timeout_ms = self.notify_timeout.as_millis() as u64,
                    "lead dispatch timed out"
                );
            }
        }
    }
}
