// src/notify/email.rs

//! Gmail notification channel.
//!
//! Sends through the Gmail REST API (`users/me/messages/send`) with a
//! bearer token provisioned externally. The message is a minimal RFC 2822
//! document, base64url-encoded into the API's `raw` field.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::Client;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{GmailSecrets, NotifyConfig};

use super::Channel;

const SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Gmail REST API channel.
pub struct GmailChannel {
    access_token: String,
    to: String,
    from: String,
    client: Client,
}

impl GmailChannel {
    pub fn new(config: &NotifyConfig, secrets: &GmailSecrets) -> Result<Self> {
        let client = Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            access_token: secrets.access_token.clone(),
            to: config.email_to.clone(),
            from: config.email_from.clone(),
            client,
        })
    }

    /// Build the base64url-encoded RFC 2822 message for the `raw` field.
    fn encode_message(&self, subject: &str, body: &str) -> String {
        let message = format!(
            "To: {}\r\nFrom: {}\r\nSubject: {}\r\n\r\n{}",
            self.to, self.from, subject, body
        );
        URL_SAFE_NO_PAD.encode(message)
    }
}

#[async_trait]
impl Channel for GmailChannel {
    fn name(&self) -> &'static str {
        "gmail"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let payload = json!({ "raw": self.encode_message(subject, body) });

        let response = self
            .client
            .post(SEND_URL)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let response_body = response.text().await.unwrap_or_default();
            return Err(AppError::channel(
                "gmail",
                format!("messages/send returned {status}: {response_body}"),
            ));
        }

        Ok(())
    }
}
