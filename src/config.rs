use crate::error::{RelayError, Result};
use serde::Deserialize;
use std::fs;
use url::Url;

pub const DEFAULT_ICON_BASE_URL: &str = "https://grokify.github.io/webhooks/icons/";
pub const DEFAULT_ICON_SUFFIX: &str = ".png";
pub const DEFAULT_EMOJI_URL_PREFIX: &str =
    "https://www.webfx.com/tools/emoji-cheat-sheet/graphics/emojis/";
pub const DEFAULT_EMOJI_URL_SUFFIX: &str = ".png";

/// Static lookups consumed by normalizers: per-source default icons and the
/// emoji-shortname-to-URL fallback. No mutation during request handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub icon_base_url: String,
    pub icon_suffix: String,
    pub emoji_url_prefix: String,
    pub emoji_url_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            icon_suffix: DEFAULT_ICON_SUFFIX.to_string(),
            emoji_url_prefix: DEFAULT_EMOJI_URL_PREFIX.to_string(),
            emoji_url_suffix: DEFAULT_EMOJI_URL_SUFFIX.to_string(),
        }
    }
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            RelayError::Config(format!("Failed to read config file '{config_path}': {e}"))
        })?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Default icon for a source, built from the configured base and suffix.
    /// Failure here is non-fatal to normalizers; they leave the icon empty.
    pub fn default_icon_url(&self, handler_key: &str) -> Result<Url> {
        if handler_key.is_empty() {
            return Err(RelayError::Config("empty handler key".to_string()));
        }
        let raw = format!("{}{}{}", self.icon_base_url, handler_key, self.icon_suffix);
        Url::parse(&raw).map_err(|e| RelayError::Config(format!("bad icon URL '{raw}': {e}")))
    }

    /// Resolves an emoji shortname like `:smile:` to an image URL.
    pub fn emoji_to_url(&self, emoji: &str) -> Result<Url> {
        let name = emoji.trim().trim_matches(':');
        if name.is_empty() {
            return Err(RelayError::Config("empty emoji shortname".to_string()));
        }
        let raw = format!("{}{}{}", self.emoji_url_prefix, name, self.emoji_url_suffix);
        Url::parse(&raw).map_err(|e| RelayError::Config(format!("bad emoji URL '{raw}': {e}")))
    }
}
