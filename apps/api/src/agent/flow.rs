//! Turn state machine for one session.
//!
//! `transition` is pure and total: every (phase, gate, event) triple maps to
//! exactly one next phase.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingInput,
    DraftingReply,
    AwaitingEmailConfirmation,
    /// Resting phase once the follow-up email has gone out.
    Sent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    UserMessage { has_email: bool },
    ReplyDelivered,
    EmailSent,
    EmailFailed,
    TurnAborted,
}

impl Phase {
    /// Where a session waits between turns.
    pub fn resting(email_gate_open: bool) -> Self {
        if email_gate_open {
            Phase::AwaitingInput
        } else {
            Phase::Sent
        }
    }

    pub fn is_resting(&self) -> bool {
        matches!(self, Phase::AwaitingInput | Phase::Sent)
    }
}

pub fn transition(phase: Phase, email_gate_open: bool, event: Event) -> Phase {
    use Event::*;
    use Phase::*;

    match (phase, event) {
        (AwaitingInput | Sent, UserMessage { has_email: true }) if email_gate_open => {
            AwaitingEmailConfirmation
        }
        (AwaitingInput | Sent, UserMessage { .. }) => DraftingReply,
        (DraftingReply, ReplyDelivered) => Phase::resting(email_gate_open),
        (AwaitingEmailConfirmation, EmailSent) => Sent,
        (AwaitingEmailConfirmation, EmailFailed) => Phase::resting(email_gate_open),
        (_, TurnAborted) => Phase::resting(email_gate_open),
        (current, _) => current,
    }
}
