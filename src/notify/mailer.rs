//! Outbound email delivery.

use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("email API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email API rejected the message: {0}")]
    Rejected(String),
}

/// Delivery abstraction so the outbox dispatcher can be tested without a
/// network and the service can run without an API key.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message, returning the provider's message id.
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<String, MailerError>;
}

/// Mailer backed by the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl ResendMailer {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: "https://api.resend.com/emails".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Mailer for ResendMailer {
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<String, MailerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": from,
                "to": [to],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected(format!("{status}: {body}")));
        }

        let body: serde_json::Value = response.json().await?;
        Ok(body
            .get("id")
            .and_then(|id| id.as_str())
            .unwrap_or_default()
            .to_string())
    }
}

/// Mailer used when no API key is configured: logs and reports success so
/// the outbox drains instead of retrying forever.
pub struct NoopMailer;

#[async_trait::async_trait]
impl Mailer for NoopMailer {
    async fn send(
        &self,
        _from: &str,
        to: &str,
        subject: &str,
        _html: &str,
    ) -> Result<String, MailerError> {
        tracing::info!("Email delivery disabled; would send '{}' to {}", subject, to);
        Ok(String::new())
    }
}
