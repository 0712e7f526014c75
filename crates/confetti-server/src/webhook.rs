//! Outbound webhook messenger.
//!
//! Delivers announcements as JSON posts in the shape incoming-webhook
//! integrations expect: `{"channel": ..., "text": ...}`.

use async_trait::async_trait;

use confetti_engine::Messenger;

pub struct WebhookMessenger {
    url: String,
    client: reqwest::Client,
}

impl WebhookMessenger {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Messenger for WebhookMessenger {
    async fn send_message(&self, channel: &str, text: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({ "channel": channel, "text": text });
        self.client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Webhook endpoints carry no channel directory; the handle is taken
    /// as its own display name.
    async fn resolve_channel(&self, channel: &str) -> anyhow::Result<String> {
        Ok(channel.to_string())
    }
}
