use serde::{Deserialize, Serialize};

/// Unified chat-message shape every normalizer produces. Built once by a
/// normalizer, never mutated afterwards, consumed exactly once by an adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub activity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, rename = "icon", skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// A message is forwardable only if it has an activity line or at least
    /// one attachment carrying fields. Normalizers must reject anything else
    /// rather than emit an empty notification.
    pub fn has_content(&self) -> bool {
        !self.activity.is_empty() || self.attachments.iter().any(|a| !a.fields.is_empty())
    }
}

/// Groups related supplementary details (commit info, build duration, etc.).
/// Field order matches presentation order on the destination platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Hint that the destination may render this field inline with siblings.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub short: bool,
}
