//! Prompt assembly for the chat-completions API

use frontdesk_core::{Turn, TurnRole};
use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl From<TurnRole> for Role {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
            TurnRole::System => Role::System,
        }
    }
}

/// One chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Builds the message list: system instruction, then transcript
/// history, then the latest context summary as the final user message.
#[derive(Debug, Default)]
pub struct PromptBuilder {
    system: Option<String>,
    history: Vec<Message>,
    context: Option<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the system instruction
    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system = Some(instruction.into());
        self
    }

    /// Append transcript turns as history
    pub fn with_transcript(mut self, transcript: &[Turn]) -> Self {
        self.history.extend(transcript.iter().map(|t| Message {
            role: t.role.into(),
            content: t.content.clone(),
        }));
        self
    }

    /// Set the final context summary (known slots + latest utterance)
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Assemble the message list
    pub fn build(self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        if let Some(system) = self.system {
            messages.push(Message::system(system));
        }
        messages.extend(self.history);
        if let Some(context) = self.context {
            messages.push(Message::user(context));
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_order() {
        let transcript = vec![Turn::user("hi"), Turn::assistant("hello")];
        let messages = PromptBuilder::new()
            .with_system("be brief")
            .with_transcript(&transcript)
            .with_context("Known so far: nothing")
            .build();

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].role, Role::User);
        assert!(messages[3].content.contains("Known so far"));
    }

    #[test]
    fn test_empty_builder() {
        assert!(PromptBuilder::new().build().is_empty());
    }
}
