//! Follow-Up Composer: drafts the one follow-up email of a conversation.

use serde::Deserialize;
use tracing::debug;

use crate::agent::prompts::{COMPOSER_PROMPT_TEMPLATE, COMPOSER_SYSTEM_TEMPLATE};
use crate::email::{EmailDraft, SendResult};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{complete_json, CompletionModel, LlmError};

pub const FOLLOW_UP_SUBJECT: &str = "Follow-Up: Discussion Opportunity";

#[derive(Debug, Deserialize)]
struct ComposedEmail {
    recipient_name: Option<String>,
    html_body: String,
}

#[derive(Debug, Clone)]
pub struct FollowUpComposer {
    sender_name: String,
}

impl FollowUpComposer {
    pub fn new(sender_name: impl Into<String>) -> Self {
        Self {
            sender_name: sender_name.into(),
        }
    }

    /// Asks the model for the HTML body and wraps it in a draft with the
    /// fixed follow-up subject.
    pub async fn draft(
        &self,
        model: &dyn CompletionModel,
        recipient: &str,
        conversation: &str,
    ) -> Result<EmailDraft, LlmError> {
        let system = COMPOSER_SYSTEM_TEMPLATE
            .replace("{name}", &self.sender_name)
            .replace("{json_only}", JSON_ONLY_SYSTEM);
        let prompt = COMPOSER_PROMPT_TEMPLATE
            .replace("{name}", &self.sender_name)
            .replace("{recipient}", recipient)
            .replace("{conversation}", conversation);

        let composed: ComposedEmail = complete_json(model, &prompt, &system).await?;
        if composed.html_body.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        debug!(
            "Drafted follow-up for {recipient} (name known: {})",
            composed.recipient_name.is_some()
        );

        Ok(EmailDraft {
            to: recipient.to_string(),
            subject: FOLLOW_UP_SUBJECT.to_string(),
            html_body: composed.html_body,
        })
    }

    /// Plain-language outcome shown to the visitor.
    pub fn confirmation(recipient: &str, result: &SendResult) -> String {
        match result {
            SendResult::Sent { .. } => format!("✅ Email sent successfully to {recipient}"),
            SendResult::Error { message } => format!(
                "⚠️ I couldn't send the follow-up email to {recipient} ({message}). \
                 Please double-check the address and share it again."
            ),
        }
    }
}
