//! Server-rendered pages: the static about page and the chat page shell.

use axum::{extract::State, response::Html};

use crate::config::ProfileConfig;
use crate::routes::sessions::QUICK_PROMPTS;
use crate::state::AppState;

const LAYOUT: &str = include_str!("../../static/layout.html");
const ABOUT_BODY: &str = include_str!("../../static/about.html");
const CHAT_BODY: &str = include_str!("../../static/chat.html");

/// GET /
pub async fn about_page(State(state): State<AppState>) -> Html<String> {
    Html(render_about(&state.profile))
}

/// GET /chat
pub async fn chat_page(State(state): State<AppState>) -> Html<String> {
    Html(render_chat(&state.profile))
}

fn render_about(profile: &ProfileConfig) -> String {
    let skills = profile
        .skills
        .iter()
        .map(|s| format!(r#"<span class="skill-badge">{}</span>"#, escape_html(s)))
        .collect::<Vec<_>>()
        .join("\n");

    let body = ABOUT_BODY
        .replace("{headline}", &escape_html(&profile.headline))
        .replace("{summary}", &escape_html(&profile.summary))
        .replace("{skills}", &skills);
    layout(profile, "Home", &body)
}

fn render_chat(profile: &ProfileConfig) -> String {
    let buttons = QUICK_PROMPTS
        .iter()
        .map(|q| {
            format!(
                r#"<button type="button" class="quick" data-prompt="{}">{}</button>"#,
                q.id,
                escape_html(q.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    layout(profile, "Chat", &CHAT_BODY.replace("{quick_prompts}", &buttons))
}

fn layout(profile: &ProfileConfig, title: &str, body: &str) -> String {
    let links = profile
        .links
        .iter()
        .map(|l| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                escape_html(&l.url),
                escape_html(&l.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Body first: it may carry {name} placeholders of its own.
    LAYOUT
        .replace("{title}", title)
        .replace("{links}", &links)
        .replace("{body}", body)
        .replace("{name}", &escape_html(&profile.name))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
