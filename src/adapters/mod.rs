use crate::error::{RelayError, Result};
use crate::message::Message;

pub mod glip;
pub mod slack;

pub use glip::GlipAdapter;
pub use slack::SlackAdapter;

/// Raw destination response, forwarded verbatim to the original caller for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct AdapterResponse {
    pub status: u16,
    pub body: String,
}

/// Destination-specific delivery. Each implementation owns its serialization
/// into the platform's wire schema and its transport client. Delivery is
/// fire-and-forget: exactly one attempt per `send`, no retry, no queuing.
#[async_trait::async_trait]
pub trait Adapter: Send + Sync {
    /// Short identifier for this destination platform, used in logs and routing.
    fn kind(&self) -> &'static str;

    async fn send(&self, message: &Message) -> Result<AdapterResponse>;
}

impl std::fmt::Debug for dyn Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter").field("kind", &self.kind()).finish()
    }
}

/// Constructs the adapter for a platform kind, validating the destination
/// identifier up front.
pub fn new_adapter(kind: &str, destination: &str) -> Result<Box<dyn Adapter>> {
    match kind {
        glip::ADAPTER_KIND => Ok(Box::new(GlipAdapter::new(destination)?)),
        slack::ADAPTER_KIND => Ok(Box::new(SlackAdapter::new(destination)?)),
        _ => Err(RelayError::InvalidDestination(format!(
            "unknown adapter kind: {kind}"
        ))),
    }
}
