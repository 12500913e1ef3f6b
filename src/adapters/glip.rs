use serde::Serialize;
use tracing::debug;
use url::Url;

use super::{Adapter, AdapterResponse};
use crate::error::{RelayError, Result};
use crate::message::Message;

pub const ADAPTER_KIND: &str = "glip";
pub const WEBHOOK_BASE_URL: &str = "https://hooks.glip.com/webhook/";

/// Delivers canonical messages to a Glip incoming webhook. Glip has no
/// structured attachment support on this endpoint, so attachments are
/// rendered into the markdown body.
pub struct GlipAdapter {
    webhook_url: Url,
    client: reqwest::Client,
}

impl GlipAdapter {
    /// Accepts either a full webhook URL or a bare webhook token to append
    /// to the Glip hooks base URL.
    pub fn new(destination: &str) -> Result<Self> {
        let destination = destination.trim();
        let webhook_url = if destination.starts_with("https://") || destination.starts_with("http://")
        {
            let url = Url::parse(destination).map_err(|e| {
                RelayError::InvalidDestination(format!("bad webhook URL '{destination}': {e}"))
            })?;
            if url.host_str().is_none() {
                return Err(RelayError::InvalidDestination(format!(
                    "webhook URL has no host: {destination}"
                )));
            }
            url
        } else {
            if destination.is_empty()
                || !destination.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            {
                return Err(RelayError::InvalidDestination(format!(
                    "bad webhook token: '{destination}'"
                )));
            }
            Url::parse(&format!("{WEBHOOK_BASE_URL}{destination}"))
                .map_err(|e| RelayError::InvalidDestination(e.to_string()))?
        };

        Ok(Self {
            webhook_url,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl Adapter for GlipAdapter {
    fn kind(&self) -> &'static str {
        ADAPTER_KIND
    }

    async fn send(&self, message: &Message) -> Result<AdapterResponse> {
        let payload = GlipWirePayload::from_message(message);
        debug!(activity = %payload.activity, "sending glip webhook");

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(AdapterResponse { status, body })
    }
}

#[derive(Debug, Default, Serialize)]
struct GlipWirePayload {
    #[serde(skip_serializing_if = "String::is_empty")]
    icon: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    activity: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    body: String,
}

impl GlipWirePayload {
    fn from_message(message: &Message) -> Self {
        Self {
            icon: message.icon_url.clone(),
            activity: message.activity.clone(),
            body: render_body(message),
        }
    }
}

/// Folds the message body and all attachment fields into one markdown body,
/// preserving field order.
fn render_body(message: &Message) -> String {
    let mut lines = Vec::new();
    if !message.body.is_empty() {
        lines.push(message.body.clone());
    }
    for attachment in &message.attachments {
        if let Some(title) = &attachment.title {
            if !title.is_empty() {
                lines.push(format!("**{title}**"));
            }
        }
        for field in &attachment.fields {
            if field.title.is_empty() {
                lines.push(format!("> {}", field.value));
            } else {
                lines.push(format!("> **{}**: {}", field.title, field.value));
            }
        }
    }
    lines.join("\n")
}
