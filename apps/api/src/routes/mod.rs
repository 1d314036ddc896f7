pub mod health;
pub mod pages;
pub mod sessions;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(pages::about_page))
        .route("/chat", get(pages::chat_page))
        // Chat API
        .route("/api/v1/quick-prompts", get(sessions::handle_quick_prompts))
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:id/messages",
            post(sessions::handle_send_message),
        )
        .route(
            "/api/v1/sessions/:id/history",
            delete(sessions::handle_clear_history),
        )
        .with_state(state)
}
