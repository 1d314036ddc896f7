//! Conversation Bridge: runs one chat turn against the hosted model.
//!
//! Model calls are bounded by `turn_timeout`; the mailer runs under its own
//! timeout. History is only appended once the turn has produced a reply, so a
//! failed turn leaves the session exactly as it was.

use std::future::Future;
use std::iter;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::agent::composer::FollowUpComposer;
use crate::agent::detect::find_email_address;
use crate::agent::flow::{transition, Event, Phase};
use crate::agent::persona::PersonaProfile;
use crate::email::{Mailer, SendResult};
use crate::errors::AppError;
use crate::llm_client::{CompletionModel, LlmError};
use crate::session::{render_prompt, Session, Turn};

#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub reply: String,
    /// True when the follow-up composer handled the turn.
    pub handed_off: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<SendResult>,
}

#[derive(Clone)]
pub struct ConversationBridge {
    model: Arc<dyn CompletionModel>,
    mailer: Arc<dyn Mailer>,
    persona: Arc<PersonaProfile>,
    composer: FollowUpComposer,
    turn_timeout: Duration,
}

impl ConversationBridge {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        mailer: Arc<dyn Mailer>,
        persona: Arc<PersonaProfile>,
        turn_timeout: Duration,
    ) -> Self {
        let composer = FollowUpComposer::new(persona.name.clone());
        Self {
            model,
            mailer,
            persona,
            composer,
            turn_timeout,
        }
    }

    /// Handles one user message and appends the exchange on success.
    #[instrument(name = "chat_turn", skip_all, fields(session_id = %session.id))]
    pub async fn respond(&self, session: &mut Session, message: &str) -> Result<TurnReply, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("message cannot be empty".to_string()));
        }
        if !session.phase.is_resting() {
            warn!("Session phase {:?} was not resting; resetting", session.phase);
            session.phase = Phase::resting(session.email_gate_open());
        }
        session.touch();

        let recipient = find_email_address(message);
        session.phase = transition(
            session.phase,
            session.email_gate_open(),
            Event::UserMessage {
                has_email: recipient.is_some(),
            },
        );

        let result = match (session.phase, recipient) {
            (Phase::AwaitingEmailConfirmation, Some(recipient)) => {
                self.hand_off(session, message, &recipient).await
            }
            _ => self.reply_as_persona(session, message).await,
        };

        if result.is_err() {
            session.phase = transition(session.phase, session.email_gate_open(), Event::TurnAborted);
        }
        result
    }

    async fn reply_as_persona(
        &self,
        session: &mut Session,
        message: &str,
    ) -> Result<TurnReply, AppError> {
        let pending = Turn::user(message);
        let prompt = render_prompt(session.history.turns().iter().chain(iter::once(&pending)));
        let system = self.persona.system_prompt(!session.email_gate_open());

        let reply = self
            .bounded(self.model.complete(&prompt, &system))
            .await?;

        session.phase = transition(session.phase, session.email_gate_open(), Event::ReplyDelivered);
        session.history.push_exchange(message, reply.clone());

        Ok(TurnReply {
            reply,
            handed_off: false,
            email: None,
        })
    }

    async fn hand_off(
        &self,
        session: &mut Session,
        message: &str,
        recipient: &str,
    ) -> Result<TurnReply, AppError> {
        info!("Handing off to follow-up composer for {recipient}");

        let pending = Turn::user(message);
        let conversation =
            render_prompt(session.history.turns().iter().chain(iter::once(&pending)));
        let draft = self
            .bounded(self.composer.draft(self.model.as_ref(), recipient, &conversation))
            .await?;

        // Dispatch is not bounded by the turn timeout; the mailer carries its own.
        // The gate is claimed first so a dropped turn can never send twice.
        session.dispatch_pending = true;
        let result = self.mailer.send(&draft).await;
        session.dispatch_pending = false;
        let event = if result.is_sent() {
            session.emails_sent += 1;
            Event::EmailSent
        } else {
            Event::EmailFailed
        };
        session.phase = transition(session.phase, session.email_gate_open(), event);

        let reply = FollowUpComposer::confirmation(recipient, &result);
        session.history.push_exchange(message, reply.clone());

        Ok(TurnReply {
            reply,
            handed_off: true,
            email: Some(result),
        })
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, LlmError>>,
    {
        match tokio::time::timeout(self.turn_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AppError::Llm(e.to_string())),
            Err(_) => Err(AppError::UpstreamTimeout(self.turn_timeout.as_secs())),
        }
    }
}
