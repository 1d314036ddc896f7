use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: Option<String>,
    pub sendgrid_api_key: String,
    pub sendgrid_api_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub resume_path: String,
    pub profile: ProfileConfig,
    pub turn_timeout: Duration,
    pub session_idle_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

/// Static "about" page content for the represented person.
#[derive(Debug, Clone, Default)]
pub struct ProfileConfig {
    pub name: String,
    pub headline: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub links: Vec<ProfileLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileLink {
    pub label: String,
    pub url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let name = require_env("PERSONA_NAME")?;

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_api_url: std::env::var("ANTHROPIC_API_URL").ok(),
            sendgrid_api_key: require_env("SENDGRID_API_KEY")?,
            sendgrid_api_url: std::env::var("SENDGRID_API_URL")
                .unwrap_or_else(|_| "https://api.sendgrid.com".to_string()),
            sender_email: require_env("SENDER_EMAIL")?,
            sender_name: std::env::var("SENDER_NAME").unwrap_or_else(|_| name.clone()),
            resume_path: std::env::var("RESUME_PATH").unwrap_or_else(|_| "resume.pdf".to_string()),
            profile: ProfileConfig {
                headline: std::env::var("PERSONA_HEADLINE").unwrap_or_default(),
                summary: std::env::var("PERSONA_SUMMARY").unwrap_or_default(),
                skills: parse_list(&std::env::var("PERSONA_SKILLS").unwrap_or_default()),
                links: parse_links(&std::env::var("PERSONA_LINKS").unwrap_or_default())?,
                name,
            },
            turn_timeout: Duration::from_secs(parse_secs("TURN_TIMEOUT_SECS", 90)?),
            session_idle_ttl: Duration::from_secs(parse_secs("SESSION_IDLE_TTL_SECS", 3600)?),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_secs(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds")),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated list, dropping blank items.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses `label=url` pairs separated by commas.
pub fn parse_links(raw: &str) -> Result<Vec<ProfileLink>> {
    parse_list(raw)
        .into_iter()
        .map(|item| {
            let (label, url) = item
                .split_once('=')
                .with_context(|| format!("PERSONA_LINKS entry '{item}' must be label=url"))?;
            Ok(ProfileLink {
                label: label.trim().to_string(),
                url: url.trim().to_string(),
            })
        })
        .collect()
}
