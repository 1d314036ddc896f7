//! Axum route handlers for the chat session API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::agent::flow::Phase;
use crate::bridge::TurnReply;
use crate::errors::AppError;
use crate::session::{Session, Turn};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Quick prompts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuickPrompt {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub static QUICK_PROMPTS: [QuickPrompt; 3] = [
    QuickPrompt {
        id: "experience",
        label: "📚 Tell me about your experience",
        prompt: "Tell me about your work experience",
    },
    QuickPrompt {
        id: "skills",
        label: "🛠️ What are your skills?",
        prompt: "What are your technical skills?",
    },
    QuickPrompt {
        id: "projects",
        label: "🎯 Recent projects?",
        prompt: "What are your recent projects?",
    },
];

pub fn quick_prompt(id: &str) -> Option<&'static QuickPrompt> {
    QUICK_PROMPTS.iter().find(|q| q.id == id)
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub phase: Phase,
    pub email_sent: bool,
    pub created_at: DateTime<Utc>,
    pub history: Vec<Turn>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            phase: session.phase,
            email_sent: !session.email_gate_open(),
            created_at: session.created_at,
            history: session.history.turns().to_vec(),
        }
    }
}

/// Exactly one of `message` or `quick_prompt` must be set.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: Option<String>,
    pub quick_prompt: Option<String>,
}

impl SendMessageRequest {
    fn resolve(self) -> Result<String, AppError> {
        match (self.message, self.quick_prompt) {
            (Some(message), None) => Ok(message),
            (None, Some(id)) => quick_prompt(&id)
                .map(|q| q.prompt.to_string())
                .ok_or_else(|| AppError::Validation(format!("unknown quick_prompt '{id}'"))),
            _ => Err(AppError::Validation(
                "provide exactly one of message or quick_prompt".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    #[serde(flatten)]
    pub turn: TurnReply,
    pub history_len: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Mutex<Session>>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// GET /api/v1/quick-prompts
pub async fn handle_quick_prompts() -> Json<&'static [QuickPrompt]> {
    Json(QUICK_PROMPTS.as_slice())
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// POST /api/v1/sessions/:id/messages
///
/// Runs one chat turn. Turns within a session are serialized by its lock.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let message = request.resolve()?;
    let session = find_session(&state, id).await?;
    let mut session = session.lock().await;

    let turn = state.bridge.respond(&mut session, &message).await?;

    Ok(Json(SendMessageResponse {
        turn,
        history_len: session.history.len(),
    }))
}

/// DELETE /api/v1/sessions/:id/history
pub async fn handle_clear_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id).await?;
    session.lock().await.clear();
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    state.sessions.remove(id).await;
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::agent::persona::PersonaProfile;
    use crate::bridge::ConversationBridge;
    use crate::config::ProfileConfig;
    use crate::routes::build_router;
    use crate::session::SessionStore;
    use crate::testing::{RecordingMailer, ScriptedModel, COMPOSED_EMAIL};

    fn app(model: ScriptedModel, mailer: Arc<RecordingMailer>) -> (Router, SessionStore) {
        let sessions = SessionStore::new(Duration::from_secs(3600));
        let state = AppState {
            bridge: ConversationBridge::new(
                Arc::new(model),
                mailer,
                Arc::new(PersonaProfile::new("Ada Lovelace", "Resume text\n")),
                Duration::from_secs(5),
            ),
            sessions: sessions.clone(),
            profile: Arc::new(ProfileConfig {
                name: "Ada Lovelace".to_string(),
                ..ProfileConfig::default()
            }),
        };
        (build_router(state), sessions)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn new_session(app: &Router) -> String {
        let (status, body) = call(app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_chat_round_trip_and_clear() {
        let mailer = Arc::new(RecordingMailer::accepting());
        let (app, _) = app(ScriptedModel::new(["I build ML systems."]), mailer);
        let id = new_session(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"message": "What do you do?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "I build ML systems.");
        assert_eq!(body["handed_off"], false);
        assert_eq!(body["history_len"], 2);
        assert!(body.get("email").is_none());

        let (_, view) = call(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(view["phase"], "awaiting_input");
        assert_eq!(view["history"][0], json!({"role": "user", "content": "What do you do?"}));
        assert_eq!(view["history"][1]["role"], "assistant");

        for _ in 0..2 {
            let (status, _) =
                call(&app, "DELETE", &format!("/api/v1/sessions/{id}/history"), None).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }
        let (_, view) = call(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(view["history"], json!([]));
    }

    #[tokio::test]
    async fn test_quick_prompt_is_expanded() {
        let model = ScriptedModel::new(["Rust, Python, SQL."]);
        let mailer = Arc::new(RecordingMailer::accepting());
        let (app, sessions) = app(model, mailer);
        let id = new_session(&app).await;

        let (status, _) = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"quick_prompt": "skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let session = sessions.get(id.parse().unwrap()).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.history.turns()[0], Turn::user("What are your technical skills?"));
    }

    #[tokio::test]
    async fn test_email_in_message_reports_send_result() {
        let mailer = Arc::new(RecordingMailer::accepting());
        let (app, _) = app(ScriptedModel::new([COMPOSED_EMAIL]), mailer.clone());
        let id = new_session(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"message": "test@example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["handed_off"], true);
        assert_eq!(body["email"], json!({"status": "sent", "code": 202, "response_body": ""}));
        assert_eq!(mailer.send_count(), 1);

        let (_, view) = call(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(view["email_sent"], true);
        assert_eq!(view["phase"], "sent");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_opaque_and_keeps_history() {
        let mailer = Arc::new(RecordingMailer::accepting());
        let (app, _) = app(ScriptedModel::failing(500, "secret upstream detail"), mailer);
        let id = new_session(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"message": "Hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(!body.to_string().contains("secret upstream detail"));

        let (_, view) = call(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(view["history"], json!([]));
    }

    #[tokio::test]
    async fn test_bad_requests() {
        let mailer = Arc::new(RecordingMailer::accepting());
        let (app, _) = app(ScriptedModel::default(), mailer);
        let id = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}/messages");

        let (status, _) = call(&app, "POST", &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "POST",
            &uri,
            Some(json!({"message": "hi", "quick_prompt": "skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&app, "POST", &uri, Some(json!({"quick_prompt": "salary"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let missing = Uuid::new_v4();
        let (status, body) = call(&app, "GET", &format!("/api/v1/sessions/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_end_session_removes_it() {
        let mailer = Arc::new(RecordingMailer::accepting());
        let (app, sessions) = app(ScriptedModel::default(), mailer);
        let id = new_session(&app).await;

        let (status, _) = call(&app, "DELETE", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(sessions.get(id.parse().unwrap()).await.is_none());
    }

    #[tokio::test]
    async fn test_quick_prompts_listing() {
        let (app, _) = app(ScriptedModel::default(), Arc::new(RecordingMailer::accepting()));
        let (status, body) = call(&app, "GET", "/api/v1/quick-prompts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["id"], "experience");
        assert_eq!(body[2]["prompt"], "What are your recent projects?");
    }
}
