//! Session context: conversation history plus the per-session email gate.
//!
//! A `Session` is handed explicitly to every turn; nothing lives in ambient
//! globals. History is append-only until an explicit clear.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::flow::Phase;

pub mod store;

pub use store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
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

/// Ordered, append-only record of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one completed user/assistant exchange.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(Turn::user(user));
        self.turns.push(Turn::assistant(assistant));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// Serializes turns as `"<role>: <content>"` lines joined by `\n`.
pub fn render_prompt<'a>(turns: impl IntoIterator<Item = &'a Turn>) -> String {
    turns
        .into_iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Everything one browser session owns.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub history: ConversationHistory,
    pub phase: Phase,
    /// Confirmed sends this session. The follow-up gate is open only at zero.
    pub emails_sent: u32,
    /// Set before the mailer is called and cleared only once it answers. A turn
    /// dropped mid-send leaves it set, so the outcome is treated as delivered.
    pub dispatch_pending: bool,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            history: ConversationHistory::new(),
            phase: Phase::AwaitingInput,
            emails_sent: 0,
            dispatch_pending: false,
            created_at: now,
            last_active: now,
        }
    }

    pub fn email_gate_open(&self) -> bool {
        self.emails_sent == 0 && !self.dispatch_pending
    }

    /// Empties the visible history. The email gate stays as it is.
    pub fn clear(&mut self) {
        self.history.clear();
        self.phase = Phase::resting(self.email_gate_open());
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
