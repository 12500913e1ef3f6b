use serde::Deserialize;

use super::{BodyEncoding, Handler};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::message::{Attachment, Field, Message};

pub const HANDLER_KEY: &str = "magnumci";
pub const DISPLAY_NAME: &str = "Magnum CI";
pub const DOCUMENTATION_URL: &str = "https://github.com/magnumci/documentation/blob/master/webhooks.md";

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
    let src: MagnumciPayload = serde_json::from_slice(raw)?;

    let mut message = Message::new();
    if let Ok(icon) = config.default_icon_url(HANDLER_KEY) {
        message.icon_url = icon.to_string();
    }

    if !src.title.is_empty() {
        message.activity = src.title.clone();
    } else {
        message.activity = format!("{DISPLAY_NAME} Notification");
    }

    let mut attachment = Attachment::new();

    if !src.message.is_empty() {
        if !src.commit_url.is_empty() {
            attachment.add_field(Field {
                title: "Commit".to_string(),
                value: format!("[{}]({})", src.message, src.commit_url),
                short: false,
            });
        } else {
            attachment.add_field(Field {
                title: "Commit".to_string(),
                value: src.message.clone(),
                short: false,
            });
        }
    } else if !src.commit_url.is_empty() {
        attachment.add_field(Field {
            title: "Commit".to_string(),
            value: format!("[View Commit]({})", src.commit_url),
            short: false,
        });
    }

    if !src.author.is_empty() {
        attachment.add_field(Field {
            title: "Author".to_string(),
            value: src.author.clone(),
            short: true,
        });
    }
    if !src.duration_string.is_empty() {
        attachment.add_field(Field {
            title: "Duration".to_string(),
            value: src.duration_string.clone(),
            short: true,
        });
    }
    if !src.build_url.is_empty() {
        attachment.add_field(Field {
            value: format!("[View Build]({})", src.build_url),
            ..Field::default()
        });
    }

    // No explicit title and nothing mapped: reject rather than forward noise.
    if src.title.is_empty() && attachment.fields.is_empty() {
        return Err(RelayError::ContentNotFound);
    }

    message.add_attachment(attachment);
    Ok(message)
}

#[derive(Debug, Default, Deserialize)]
struct MagnumciPayload {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    duration_string: String,
    #[serde(default)]
    commit_url: String,
    #[serde(default)]
    build_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_payload() {
        let config = Config::default();
        let raw = json!({
            "title": "Build #12",
            "message": "Fix bug",
            "commit_url": "http://x/1",
            "author": "bob",
            "duration_string": "1m2s",
            "build_url": "http://x/build"
        })
        .to_string();

        let msg = normalize(&config, raw.as_bytes()).unwrap();

        assert_eq!(msg.activity, "Build #12");
        assert_eq!(msg.attachments.len(), 1);
        let fields = &msg.attachments[0].fields;
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].title, "Commit");
        assert_eq!(fields[0].value, "[Fix bug](http://x/1)");
        assert_eq!(fields[1].title, "Author");
        assert_eq!(fields[1].value, "bob");
        assert!(fields[1].short);
        assert_eq!(fields[2].title, "Duration");
        assert_eq!(fields[2].value, "1m2s");
        assert!(fields[2].short);
        assert_eq!(fields[3].title, "");
        assert_eq!(fields[3].value, "[View Build](http://x/build)");
        assert!(msg.has_content());
    }

    #[test]
    fn test_normalize_message_without_commit_url() {
        let config = Config::default();
        let raw = json!({"title": "Build #3", "message": "Tweak css"}).to_string();

        let msg = normalize(&config, raw.as_bytes()).unwrap();
        assert_eq!(msg.attachments[0].fields[0].value, "Tweak css");
    }

    #[test]
    fn test_normalize_commit_url_only() {
        let config = Config::default();
        let raw = json!({"commit_url": "http://x/9"}).to_string();

        let msg = normalize(&config, raw.as_bytes()).unwrap();
        assert_eq!(msg.activity, "Magnum CI Notification");
        assert_eq!(msg.attachments[0].fields[0].value, "[View Commit](http://x/9)");
    }

    #[test]
    fn test_normalize_empty_payload_is_content_not_found() {
        let config = Config::default();
        let raw = json!({}).to_string();

        let err = normalize(&config, raw.as_bytes()).unwrap_err();
        assert!(matches!(err, RelayError::ContentNotFound));
    }

    #[test]
    fn test_normalize_malformed_body_is_decode_error() {
        let config = Config::default();
        let err = normalize(&config, b"not json").unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let config = Config::default();
        let raw = json!({"title": "Build #12", "author": "bob"}).to_string();

        let first = normalize(&config, raw.as_bytes()).unwrap();
        let second = normalize(&config, raw.as_bytes()).unwrap();
        assert_eq!(first, second);
    }
}
