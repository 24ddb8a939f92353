// src/notify/telegram.rs

//! Telegram bot notification channel.
//!
//! Posts to a single chat via the Bot API `sendMessage` method. The bot
//! token and chat id come from the secrets file.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{NotifyConfig, TelegramSecrets};

use super::Channel;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram bot bound to one chat.
pub struct TelegramChannel {
    token: String,
    chat_id: String,
    silent: bool,
    client: Client,
}

impl TelegramChannel {
    pub fn new(config: &NotifyConfig, secrets: &TelegramSecrets) -> Result<Self> {
        let client = Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            token: secrets.token.clone(),
            chat_id: secrets.chat_id.clone(),
            silent: config.telegram_silent,
            client,
        })
    }

    fn send_message_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.token)
    }

    fn payload(&self, message: &str) -> serde_json::Value {
        json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "HTML",
            "disable_notification": self.silent,
        })
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = format!("{subject}\n\n{body}");
        let response = self
            .client
            .post(self.send_message_url())
            .json(&self.payload(&message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let response_body = response.text().await.unwrap_or_default();
            return Err(AppError::channel(
                "telegram",
                format!("sendMessage returned {status}: {response_body}"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_channel(silent: bool) -> TelegramChannel {
        TelegramChannel::new(
            &NotifyConfig {
                telegram_silent: silent,
                ..NotifyConfig::default()
            },
            &TelegramSecrets {
                token: "123:abc".to_string(),
                chat_id: "42".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_send_message_url_embeds_token() {
        let channel = test_channel(true);
        assert_eq!(
            channel.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_payload_shape() {
        let channel = test_channel(true);
        let payload = channel.payload("Subject\n\nBody");

        assert_eq!(payload["chat_id"], "42");
        assert_eq!(payload["text"], "Subject\n\nBody");
        assert_eq!(payload["parse_mode"], "HTML");
        assert_eq!(payload["disable_notification"], true);
    }

    #[test]
    fn test_payload_respects_silent_flag() {
        let channel = test_channel(false);
        assert_eq!(channel.payload("x")["disable_notification"], false);
    }
}
