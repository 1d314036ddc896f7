use std::sync::Arc;

use crate::bridge::ConversationBridge;
use crate::config::ProfileConfig;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub bridge: ConversationBridge,
    pub sessions: SessionStore,
    /// Static content for the about page.
    pub profile: Arc<ProfileConfig>,
}
