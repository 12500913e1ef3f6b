use serde::Deserialize;

use super::{BodyEncoding, Handler};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::message::{Attachment, Field, Message};

pub const HANDLER_KEY: &str = "semaphore";
pub const DISPLAY_NAME: &str = "Semaphore";
pub const DOCUMENTATION_URL: &str = "https://semaphoreci.com/docs/post-build-webhooks.html";

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
    let src: SemaphorePayload = serde_json::from_slice(raw)?;

    let mut message = Message::new();
    if let Ok(icon) = config.default_icon_url(HANDLER_KEY) {
        message.icon_url = icon.to_string();
    }

    message.activity = match (src.project_name.is_empty(), src.result.is_empty()) {
        (false, false) => format!(
            "{} build #{} {}",
            src.project_name, src.build_number, src.result
        ),
        (false, true) => format!("{} build #{}", src.project_name, src.build_number),
        _ => format!("{DISPLAY_NAME} Notification"),
    };

    let mut attachment = Attachment::new();

    if !src.commit.message.is_empty() {
        let value = if !src.commit.url.is_empty() {
            format!("[{}]({})", src.commit.message, src.commit.url)
        } else {
            src.commit.message.clone()
        };
        attachment.add_field(Field {
            title: "Commit".to_string(),
            value,
            short: false,
        });
    }
    if !src.branch_name.is_empty() {
        attachment.add_field(Field {
            title: "Branch".to_string(),
            value: src.branch_name.clone(),
            short: true,
        });
    }
    if !src.commit.author_name.is_empty() {
        attachment.add_field(Field {
            title: "Author".to_string(),
            value: src.commit.author_name.clone(),
            short: true,
        });
    }
    if !src.build_url.is_empty() {
        attachment.add_field(Field {
            value: format!("[View Build]({})", src.build_url),
            ..Field::default()
        });
    }

    if src.project_name.is_empty() && attachment.fields.is_empty() {
        return Err(RelayError::ContentNotFound);
    }

    message.add_attachment(attachment);
    Ok(message)
}

#[derive(Debug, Default, Deserialize)]
struct SemaphorePayload {
    #[serde(default)]
    project_name: String,
    #[serde(default)]
    branch_name: String,
    #[serde(default)]
    build_number: i64,
    #[serde(default)]
    result: String,
    #[serde(default)]
    build_url: String,
    #[serde(default)]
    commit: SemaphoreCommit,
}

#[derive(Debug, Default, Deserialize)]
struct SemaphoreCommit {
    #[serde(default)]
    url: String,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    message: String,
}
