// Persona agent and follow-up composer.
// The hand-off between them is decided by `flow::transition`, not by the model.

pub mod composer;
pub mod detect;
pub mod flow;
pub mod persona;
pub mod prompts;
