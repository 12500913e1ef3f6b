use serde::Deserialize;

use super::{BodyEncoding, Handler};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::message::{Attachment, Field, Message};

pub const HANDLER_KEY: &str = "travisci";
pub const DISPLAY_NAME: &str = "Travis CI";
pub const DOCUMENTATION_URL: &str =
    "https://docs.travis-ci.com/user/notifications/#Configuring-webhook-notifications";

pub fn handler() -> Handler {
    Handler {
        key: HANDLER_KEY,
        display_name: DISPLAY_NAME,
        documentation_url: DOCUMENTATION_URL,
        // Travis posts `payload=<json>` url-encoded.
        body_encoding: BodyEncoding::Form,
        normalize,
    }
}

pub fn normalize(config: &Config, raw: &[u8]) -> Result<Message> {
    let src: TravisPayload = serde_json::from_slice(raw)?;

    let mut message = Message::new();
    if let Ok(icon) = config.default_icon_url(HANDLER_KEY) {
        message.icon_url = icon.to_string();
    }

    let mut activity_parts = Vec::new();
    if !src.repository.name.is_empty() {
        activity_parts.push(src.repository.name.clone());
    }
    if src.number > 0 {
        activity_parts.push(format!("build #{}", src.number));
    }
    if !src.status_message.is_empty() {
        activity_parts.push(src.status_message.to_lowercase());
    }
    message.activity = if activity_parts.is_empty() {
        format!("{DISPLAY_NAME} Notification")
    } else {
        activity_parts.join(" ")
    };

    let mut attachment = Attachment::new();

    if !src.message.is_empty() {
        let value = if !src.compare_url.is_empty() {
            format!("[{}]({})", src.message, src.compare_url)
        } else {
            src.message.clone()
        };
        attachment.add_field(Field {
            title: "Commit".to_string(),
            value,
            short: false,
        });
    }
    if !src.branch.is_empty() {
        attachment.add_field(Field {
            title: "Branch".to_string(),
            value: src.branch.clone(),
            short: true,
        });
    }
    if !src.author_name.is_empty() {
        attachment.add_field(Field {
            title: "Author".to_string(),
            value: src.author_name.clone(),
            short: true,
        });
    }
    if !src.build_url.is_empty() {
        attachment.add_field(Field {
            value: format!("[View Build]({})", src.build_url),
            ..Field::default()
        });
    }

    if activity_parts.is_empty() && attachment.fields.is_empty() {
        return Err(RelayError::ContentNotFound);
    }

    message.add_attachment(attachment);
    Ok(message)
}

#[derive(Debug, Default, Deserialize)]
struct TravisPayload {
    #[serde(default)]
    number: i64,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    branch: String,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    compare_url: String,
    #[serde(default)]
    build_url: String,
    #[serde(default)]
    repository: TravisRepository,
}

#[derive(Debug, Default, Deserialize)]
struct TravisRepository {
    #[serde(default)]
    name: String,
}
