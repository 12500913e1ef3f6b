use serde::Deserialize;

use super::{BodyEncoding, Handler};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::message::Message;

pub const HANDLER_KEY: &str = "slack";
pub const DISPLAY_NAME: &str = "Slack";
pub const DOCUMENTATION_URL: &str = "https://api.slack.com/incoming-webhooks";

pub fn handler() -> Handler {
    Handler {
        key: HANDLER_KEY,
        display_name: DISPLAY_NAME,
        documentation_url: DOCUMENTATION_URL,
        // Slack-format webhooks arrive form-encoded with a `payload` field,
        // or as plain JSON when the sender sets the content type accordingly.
        body_encoding: BodyEncoding::Form,
        normalize,
    }
}

pub fn normalize(config: &Config, raw: &[u8]) -> Result<Message> {
    let src: SlackPayload = serde_json::from_slice(raw)?;

    let mut message = Message::new();
    message.body = src.text.clone();

    if !src.username.is_empty() {
        message.activity = src.username.clone();
    } else if !src.text.is_empty() {
        message.activity = format!("{DISPLAY_NAME} Notification");
    }

    // Icon preference: explicit URL, then emoji shortname, then the
    // per-source default. All three failing is non-fatal.
    if !src.icon_url.is_empty() {
        message.icon_url = src.icon_url.clone();
    } else if let Ok(icon) = config.emoji_to_url(&src.icon_emoji) {
        message.icon_url = icon.to_string();
    } else if let Ok(icon) = config.default_icon_url(HANDLER_KEY) {
        message.icon_url = icon.to_string();
    }

    if !message.has_content() {
        return Err(RelayError::ContentNotFound);
    }
    Ok(message)
}

#[derive(Debug, Default, Deserialize)]
struct SlackPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    icon_emoji: String,
    #[serde(default)]
    icon_url: String,
    #[serde(default)]
    text: String,
}
