//! In-memory call sessions
//!
//! One session per live call, keyed by the transport's call id.
//! Sessions are created on first contact, deleted the moment a lead
//! completes, and swept when a caller hangs up without finishing.
//! Nothing survives a restart; an interrupted call is a lost lead.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use frontdesk_core::conversation::Turn;

use crate::dst::LeadSlots;

/// State of one live call
#[derive(Debug, Clone)]
pub struct CallSession {
    pub call_id: String,
    /// Inbound caller id, when the transport supplied one
    pub caller_number: Option<String>,
    pub slots: LeadSlots,
    pub transcript: Vec<Turn>,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl CallSession {
    fn new(call_id: impl Into<String>, caller_number: Option<String>) -> Self {
        let now = Instant::now();
        Self {
            call_id: call_id.into(),
            caller_number,
            slots: LeadSlots::new(),
            transcript: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn append(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    /// Most recent caller utterance, if any
    pub fn last_user_utterance(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|t| t.is_user())
            .map(|t| t.content.as_str())
    }
}

/// Concurrent session store
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, CallSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Run `f` on the session for `call_id`, creating it if absent.
    /// The closure runs under the shard lock and must not block.
    pub fn with_session<R>(
        &self,
        call_id: &str,
        caller_number: Option<&str>,
        f: impl FnOnce(&mut CallSession) -> R,
    ) -> R {
        let mut entry = self
            .sessions
            .entry(call_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(call_id, "session created");
                CallSession::new(call_id, caller_number.map(str::to_string))
            });
        let session = entry.value_mut();
        if session.caller_number.is_none() {
            session.caller_number = caller_number.map(str::to_string);
        }
        session.touch();
        f(session)
    }

    pub fn get(&self, call_id: &str) -> Option<CallSession> {
        self.sessions.get(call_id).map(|s| s.value().clone())
    }

    pub fn remove(&self, call_id: &str) -> Option<CallSession> {
        self.sessions.remove(call_id).map(|(_, s)| s)
    }

    pub fn contains(&self, call_id: &str) -> bool {
        self.sessions.contains_key(call_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle longer than `max_idle`; returns how many were
    /// evicted
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.last_activity.elapsed() <= max_idle);
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.sessions.len(), "idle sessions swept");
        }
        evicted
    }
}
