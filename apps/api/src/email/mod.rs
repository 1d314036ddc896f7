//! Notification Sender: the only tool the agent layer can invoke.
//!
//! A send is one irreversible dispatch: no dry-run, no queue, no retry.
//! Failures never propagate as `Err`; they come back as `SendResult::Error`
//! so the conversation can report them in plain language.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod sendgrid;

pub use sendgrid::SendGridMailer;

/// An email composed for a single dispatch. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailDraft {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Normalized outcome of a send attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SendResult {
    Sent { code: u16, response_body: String },
    Error { message: String },
}

impl SendResult {
    /// Builds an error record, guaranteeing a non-empty message.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "unknown email provider error".to_string()
        } else {
            message
        };
        SendResult::Error { message }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, SendResult::Sent { .. })
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, draft: &EmailDraft) -> SendResult;
}
