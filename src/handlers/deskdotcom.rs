use super::{BodyEncoding, Handler};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::message::Message;

pub const HANDLER_KEY: &str = "deskdotcom";
pub const DISPLAY_NAME: &str = "Desk.com";
pub const DOCUMENTATION_URL: &str =
    "https://support.desk.com/customer/portal/articles/869334-configuring-webhooks-in-desk-com-apps";

pub fn handler() -> Handler {
    Handler {
        key: HANDLER_KEY,
        display_name: DISPLAY_NAME,
        documentation_url: DOCUMENTATION_URL,
        body_encoding: BodyEncoding::Json,
        normalize,
    }
}

/// Desk.com webhook templates emit the canonical shape directly, so the
/// payload decodes straight into a message. Only the icon fallback and the
/// content gate are applied on top.
pub fn normalize(config: &Config, raw: &[u8]) -> Result<Message> {
    let mut message: Message = serde_json::from_slice(raw)?;

    if message.icon_url.is_empty() {
        if let Ok(icon) = config.default_icon_url(HANDLER_KEY) {
            message.icon_url = icon.to_string();
        }
    }

    if !message.has_content() {
        return Err(RelayError::ContentNotFound);
    }
    Ok(message)
}
