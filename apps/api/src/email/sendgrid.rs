use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{EmailDraft, Mailer, SendResult};

/// SendGrid v3 Mail Send client with a fixed sender identity.
#[derive(Clone)]
pub struct SendGridMailer {
    client: Client,
    api_key: String,
    send_url: String,
    from: Address,
}

#[derive(Debug, Clone, Serialize)]
struct Address {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: &'a Address,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Recipient<'a>>,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendGridErrors {
    errors: Vec<SendGridErrorItem>,
}

#[derive(Debug, Deserialize)]
struct SendGridErrorItem {
    message: String,
}

impl SendGridMailer {
    pub fn new(
        api_key: String,
        base_url: &str,
        sender_email: String,
        sender_name: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            send_url: format!("{}/v3/mail/send", base_url.trim_end_matches('/')),
            from: Address {
                email: sender_email,
                name: sender_name.filter(|n| !n.trim().is_empty()),
            },
        })
    }

    async fn dispatch(&self, draft: &EmailDraft) -> Result<SendResult, reqwest::Error> {
        let body = MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![Recipient { email: &draft.to }],
            }],
            from: &self.from,
            subject: &draft.subject,
            content: vec![Content {
                content_type: "text/html",
                value: &draft.html_body,
            }],
        };

        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(SendResult::Sent {
                code: status.as_u16(),
                response_body: text,
            });
        }

        let detail = serde_json::from_str::<SendGridErrors>(&text)
            .ok()
            .and_then(|e| e.errors.into_iter().next())
            .map(|e| e.message)
            .unwrap_or(text);
        let message = if detail.trim().is_empty() {
            format!("SendGrid returned {status}")
        } else {
            format!("SendGrid returned {status}: {detail}")
        };
        Ok(SendResult::error(message))
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, draft: &EmailDraft) -> SendResult {
        let result = match self.dispatch(draft).await {
            Ok(result) => result,
            Err(e) => SendResult::error(e.to_string()),
        };

        match &result {
            SendResult::Sent { code, .. } => info!("Email sent to {} (status {code})", draft.to),
            SendResult::Error { message } => warn!("Email to {} failed: {message}", draft.to),
        }
        result
    }
}
