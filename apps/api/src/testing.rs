//! Scripted collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::email::{EmailDraft, Mailer, SendResult};
use crate::llm_client::{CompletionModel, LlmError};

/// Returns queued replies in order and records every (prompt, system) pair.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub calls: Mutex<Vec<(String, String)>>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        let model = Self::default();
        model.replies.lock().unwrap().push_back(Err(LlmError::Api {
            status,
            message: message.to_string(),
        }));
        model
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(String, String)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Records every draft and answers with a fixed result.
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailDraft>>,
    result: SendResult,
    delay: Option<Duration>,
}

impl RecordingMailer {
    pub fn accepting() -> Self {
        Self::answering(SendResult::Sent {
            code: 202,
            response_body: String::new(),
        })
    }

    pub fn answering(result: SendResult) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            result,
            delay: None,
        }
    }

    /// Holds the answer back after recording, like a slow provider.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, draft: &EmailDraft) -> SendResult {
        self.sent.lock().unwrap().push(draft.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

pub const COMPOSED_EMAIL: &str =
    r#"{"recipient_name": null, "html_body": "<p>Hi there,</p><p>Thanks for connecting!</p>"}"#;
