use std::collections::HashMap;

use crate::config::Config;
use crate::error::Result;
use crate::message::Message;

pub mod deskdotcom;
pub mod magnumci;
pub mod opsgenie;
pub mod pingdom;
pub mod semaphore;
pub mod slack;
pub mod travisci;

/// How the raw payload rides in the inbound request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// The entire request body is the payload.
    Json,
    /// The payload is the url-encoded `payload` form field, unless the
    /// content type says the body is JSON already.
    Form,
}

/// Pure per-source mapping from raw payload bytes to a canonical message.
pub type NormalizeFn = fn(&Config, &[u8]) -> Result<Message>;

/// Registered pairing of a source key with its normalization logic,
/// body-encoding expectation, and display metadata.
#[derive(Clone)]
pub struct Handler {
    pub key: &'static str,
    pub display_name: &'static str,
    pub documentation_url: &'static str,
    pub body_encoding: BodyEncoding,
    pub normalize: NormalizeFn,
}

/// Registry for source-specific normalization handlers. Built once at process
/// start and read-only afterwards; safe for unsynchronized concurrent reads.
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Handler>,
}

impl HandlerRegistry {
    /// Create a registry with all built-in source handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };
        registry.register(deskdotcom::handler());
        registry.register(magnumci::handler());
        registry.register(opsgenie::handler());
        registry.register(pingdom::handler());
        registry.register(semaphore::handler());
        registry.register(slack::handler());
        registry.register(travisci::handler());
        registry
    }

    /// Register a handler for its source key. Used only during startup.
    pub fn register(&mut self, handler: Handler) {
        self.handlers.insert(handler.key, handler);
    }

    pub fn get(&self, source_key: &str) -> Option<&Handler> {
        self.handlers.get(source_key)
    }

    /// List all registered source keys, sorted for stable display.
    pub fn list_sources(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.handlers.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_built_in_handlers() {
        let registry = HandlerRegistry::new();

        let sources = registry.list_sources();
        assert!(sources.contains(&"magnumci"));
        assert!(sources.contains(&"slack"));
        assert!(sources.contains(&"deskdotcom"));
        assert!(sources.contains(&"travisci"));
        assert!(sources.contains(&"semaphore"));
        assert!(sources.contains(&"pingdom"));
        assert!(sources.contains(&"opsgenie"));
    }

    #[test]
    fn test_registry_returns_none_for_unknown_source() {
        let registry = HandlerRegistry::new();
        assert!(registry.get("unknown_source").is_none());
    }

    #[test]
    fn test_handler_metadata_is_consistent() {
        let registry = HandlerRegistry::new();
        for key in registry.list_sources() {
            let handler = registry.get(key).unwrap();
            assert_eq!(handler.key, key);
            assert!(!handler.display_name.is_empty());
            assert!(handler.documentation_url.starts_with("https://"));
        }
    }

    #[test]
    fn test_form_encoded_handlers() {
        let registry = HandlerRegistry::new();
        assert_eq!(
            registry.get("slack").unwrap().body_encoding,
            BodyEncoding::Form
        );
        assert_eq!(
            registry.get("travisci").unwrap().body_encoding,
            BodyEncoding::Form
        );
        assert_eq!(
            registry.get("magnumci").unwrap().body_encoding,
            BodyEncoding::Json
        );
    }
}
