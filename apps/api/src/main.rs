mod agent;
mod bridge;
mod config;
mod email;
mod errors;
mod llm_client;
mod resume;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::persona::PersonaProfile;
use crate::bridge::ConversationBridge;
use crate::config::Config;
use crate::email::SendGridMailer;
use crate::llm_client::LlmClient;
use crate::resume::load_resume_text;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

const MAILER_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    // Load resume once; the process never serves without it
    let resume_text = load_resume_text(&config.resume_path).await?;
    let persona = Arc::new(PersonaProfile::new(config.profile.name.clone(), resume_text));
    info!("Persona profile ready for {}", persona.name);

    // Initialize LLM client
    let llm = match &config.anthropic_api_url {
        Some(url) => LlmClient::with_base_url(config.anthropic_api_key.clone(), url),
        None => LlmClient::new(config.anthropic_api_key.clone()),
    }
    .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize email sender
    let mailer = SendGridMailer::new(
        config.sendgrid_api_key.clone(),
        &config.sendgrid_api_url,
        config.sender_email.clone(),
        Some(config.sender_name.clone()),
        MAILER_TIMEOUT,
    )
    .context("Failed to build SendGrid client")?;
    info!("Email sender initialized (from: {})", config.sender_email);

    let bridge = ConversationBridge::new(
        Arc::new(llm),
        Arc::new(mailer),
        persona,
        config.turn_timeout,
    );

    let sessions = SessionStore::new(config.session_idle_ttl);
    let _sweeper = sessions.spawn_sweeper();

    // Build app state
    let state = AppState {
        bridge,
        sessions,
        profile: Arc::new(config.profile.clone()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the site has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
