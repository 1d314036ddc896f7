use crate::agent::prompts::{
    EMAIL_ALREADY_SENT_NOTE, EMAIL_PENDING_NOTE, PERSONA_SYSTEM_TEMPLATE,
};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;

/// The represented person: name plus resume text. Built once at startup and
/// shared read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct PersonaProfile {
    pub name: String,
    pub resume_text: String,
}

impl PersonaProfile {
    pub fn new(name: impl Into<String>, resume_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resume_text: resume_text.into(),
        }
    }

    /// Persona instructions with the resume embedded.
    pub fn system_prompt(&self, email_already_sent: bool) -> String {
        let email_status = if email_already_sent {
            EMAIL_ALREADY_SENT_NOTE
        } else {
            EMAIL_PENDING_NOTE
        };

        let prompt = PERSONA_SYSTEM_TEMPLATE
            .replace("{name}", &self.name)
            .replace("{email_status}", email_status)
            .replace("{resume}", &self.resume_text);
        format!("{prompt}\n\n{GROUNDING_INSTRUCTION}")
    }
}
