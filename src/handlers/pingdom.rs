use serde::Deserialize;

use super::{BodyEncoding, Handler};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::message::{Attachment, Field, Message};

pub const HANDLER_KEY: &str = "pingdom";
pub const DISPLAY_NAME: &str = "Pingdom";
pub const DOCUMENTATION_URL: &str =
    "https://www.pingdom.com/resources/webhooks";

pub fn handler() -> Handler {
    Handler {
        key: HANDLER_KEY,
        display_name: DISPLAY_NAME,
        documentation_url: DOCUMENTATION_URL,
        body_encoding: BodyEncoding::Json,
        normalize,
    }
}

pub fn normalize(config: &Config, raw: &[u8]) -> Result<Message> {
    let src: PingdomPayload = serde_json::from_slice(raw)?;

    // check_name is required for this source; a state change without it
    // cannot be attributed to anything and is rejected outright.
    if src.check_name.is_empty() {
        return Err(RelayError::ContentNotFound);
    }

    let mut message = Message::new();
    if let Ok(icon) = config.default_icon_url(HANDLER_KEY) {
        message.icon_url = icon.to_string();
    }

    message.activity = if src.current_state.is_empty() {
        format!("{} check update", src.check_name)
    } else {
        format!("{} is {}", src.check_name, src.current_state)
    };

    let mut attachment = Attachment::new();

    if !src.current_state.is_empty() {
        attachment.add_field(Field {
            title: "State".to_string(),
            value: src.current_state.clone(),
            short: true,
        });
    }
    if !src.previous_state.is_empty() {
        attachment.add_field(Field {
            title: "Previous State".to_string(),
            value: src.previous_state.clone(),
            short: true,
        });
    }
    if !src.description.is_empty() {
        attachment.add_field(Field {
            title: "Description".to_string(),
            value: src.description.clone(),
            short: false,
        });
    }

    message.add_attachment(attachment);
    Ok(message)
}

#[derive(Debug, Default, Deserialize)]
struct PingdomPayload {
    #[serde(default)]
    check_name: String,
    #[serde(default)]
    current_state: String,
    #[serde(default)]
    previous_state: String,
    #[serde(default)]
    description: String,
}
