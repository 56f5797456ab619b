use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

/// Delivery transport for operator notifications. Implementations report
/// success as a boolean and never propagate transport errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, chat_id: &str, text: &str) -> bool;
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build Telegram HTTP client")?;
        Ok(Self { client, bot_token })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, chat_id: &str, text: &str) -> bool {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        match self.client.post(&url).json(&payload).send().await {
            Ok(response) => match response.error_for_status() {
                Ok(_) => true,
                Err(e) => {
                    warn!("Telegram API rejected message for chat_id={}: {}", chat_id, e);
                    false
                }
            },
            Err(e) => {
                warn!("Telegram API request failed for chat_id={}: {}", chat_id, e);
                false
            }
        }
    }
}
