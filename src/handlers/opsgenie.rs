use serde::Deserialize;

use super::{BodyEncoding, Handler};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::message::{Attachment, Field, Message};

pub const HANDLER_KEY: &str = "opsgenie";
pub const DISPLAY_NAME: &str = "OpsGenie";
pub const DOCUMENTATION_URL: &str = "https://docs.opsgenie.com/docs/webhook-integration";

pub fn handler() -> Handler {
    Handler {
        key: HANDLER_KEY,
        display_name: DISPLAY_NAME,
        documentation_url: DOCUMENTATION_URL,
        body_encoding: BodyEncoding::Json,
        normalize,
    }
}

/// OpsGenie multiplexes several alert events over one webhook; the `action`
/// field is the explicit discriminator selecting the mapping-rule set.
pub fn normalize(config: &Config, raw: &[u8]) -> Result<Message> {
    let src: OpsgeniePayload = serde_json::from_slice(raw)?;

    let event = match src.action.as_str() {
        "Create" => AlertEvent::Created,
        "Close" => AlertEvent::Closed,
        "Acknowledge" => AlertEvent::Acknowledged,
        "AddNote" => AlertEvent::NoteAdded,
        _ => return Err(RelayError::ContentNotFound),
    };

    if src.alert.message.is_empty() {
        return Err(RelayError::ContentNotFound);
    }

    let mut message = Message::new();
    if let Ok(icon) = config.default_icon_url(HANDLER_KEY) {
        message.icon_url = icon.to_string();
    }

    message.activity = match event {
        AlertEvent::Created => format!("Alert created: {}", src.alert.message),
        AlertEvent::Closed => format!("Alert closed: {}", src.alert.message),
        AlertEvent::Acknowledged => format!("Alert acknowledged: {}", src.alert.message),
        AlertEvent::NoteAdded => format!("Note added to alert: {}", src.alert.message),
    };

    let mut attachment = Attachment::new();

    if !src.alert.tiny_id.is_empty() {
        attachment.add_field(Field {
            title: "Alert ID".to_string(),
            value: src.alert.tiny_id.clone(),
            short: true,
        });
    }
    if !src.alert.username.is_empty() {
        let title = match event {
            AlertEvent::Acknowledged => "Acknowledged By",
            AlertEvent::Closed => "Closed By",
            _ => "Owner",
        };
        attachment.add_field(Field {
            title: title.to_string(),
            value: src.alert.username.clone(),
            short: true,
        });
    }
    if matches!(event, AlertEvent::NoteAdded) && !src.alert.note.is_empty() {
        attachment.add_field(Field {
            title: "Note".to_string(),
            value: src.alert.note.clone(),
            short: false,
        });
    }

    message.add_attachment(attachment);
    Ok(message)
}

#[derive(Debug, Clone, Copy)]
enum AlertEvent {
    Created,
    Closed,
    Acknowledged,
    NoteAdded,
}

#[derive(Debug, Default, Deserialize)]
struct OpsgeniePayload {
    #[serde(default)]
    action: String,
    #[serde(default)]
    alert: OpsgenieAlert,
}

#[derive(Debug, Default, Deserialize)]
struct OpsgenieAlert {
    #[serde(default)]
    message: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    note: String,
    #[serde(default, rename = "tinyId")]
    tiny_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_create_action() {
        let config = Config::default();
        let raw = json!({
            "action": "Create",
            "alert": {"message": "CPU above 90%", "username": "dave", "tinyId": "42"}
        })
        .to_string();

        let msg = normalize(&config, raw.as_bytes()).unwrap();
        assert_eq!(msg.activity, "Alert created: CPU above 90%");
        let fields = &msg.attachments[0].fields;
        assert_eq!(fields[0].title, "Alert ID");
        assert_eq!(fields[1].title, "Owner");
    }

    #[test]
    fn test_normalize_add_note_action() {
        let config = Config::default();
        let raw = json!({
            "action": "AddNote",
            "alert": {"message": "CPU above 90%", "note": "looking into it", "username": "erin"}
        })
        .to_string();

        let msg = normalize(&config, raw.as_bytes()).unwrap();
        assert_eq!(msg.activity, "Note added to alert: CPU above 90%");
        let fields = &msg.attachments[0].fields;
        assert_eq!(fields[0].title, "Owner");
        assert_eq!(fields[1].title, "Note");
        assert_eq!(fields[1].value, "looking into it");
    }

    #[test]
    fn test_normalize_unknown_action_is_content_not_found() {
        let config = Config::default();
        let raw = json!({"action": "Escalate", "alert": {"message": "x"}}).to_string();

        let err = normalize(&config, raw.as_bytes()).unwrap_err();
        assert!(matches!(err, RelayError::ContentNotFound));
    }

    #[test]
    fn test_normalize_missing_alert_message_is_content_not_found() {
        let config = Config::default();
        let raw = json!({"action": "Create"}).to_string();

        let err = normalize(&config, raw.as_bytes()).unwrap_err();
        assert!(matches!(err, RelayError::ContentNotFound));
    }
}
