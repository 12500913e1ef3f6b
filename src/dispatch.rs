use tracing::{debug, info};

use crate::adapters::{Adapter, AdapterResponse};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::handlers::{BodyEncoding, HandlerRegistry};

pub const FORM_PAYLOAD_FIELD: &str = "payload";

/// The parts of an inbound request the pipeline needs: the content type and
/// the raw body. Transport details stay with the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl InboundRequest {
    pub fn new(content_type: Option<String>, body: Vec<u8>) -> Self {
        Self { content_type, body }
    }

    fn is_json(&self) -> bool {
        match &self.content_type {
            Some(ct) => {
                let mime = ct.split(';').next().unwrap_or("").trim();
                mime.eq_ignore_ascii_case("application/json")
            }
            None => false,
        }
    }
}

/// Pulls the payload bytes out of the request per the handler's declared
/// body encoding. Form-encoded handlers still accept plain JSON bodies when
/// the content type says so.
pub fn extract_payload(encoding: BodyEncoding, request: &InboundRequest) -> Result<Vec<u8>> {
    match encoding {
        BodyEncoding::Json => Ok(request.body.clone()),
        BodyEncoding::Form => {
            if request.is_json() {
                return Ok(request.body.clone());
            }
            for (key, value) in url::form_urlencoded::parse(&request.body) {
                if key == FORM_PAYLOAD_FIELD {
                    return Ok(value.into_owned().into_bytes());
                }
            }
            Err(RelayError::Payload(format!(
                "form body has no '{FORM_PAYLOAD_FIELD}' field"
            )))
        }
    }
}

/// Runs one inbound notification through the pipeline: handler lookup,
/// payload extraction, normalization, then a single delivery attempt.
/// Errors propagate untouched for the HTTP layer to map to a status.
pub async fn dispatch(
    registry: &HandlerRegistry,
    config: &Config,
    source_key: &str,
    adapter: &dyn Adapter,
    request: &InboundRequest,
) -> Result<AdapterResponse> {
    let handler = registry
        .get(source_key)
        .ok_or_else(|| RelayError::UnknownSource(source_key.to_string()))?;

    let payload = extract_payload(handler.body_encoding, request)?;
    debug!(source = handler.key, bytes = payload.len(), "extracted payload");

    let message = (handler.normalize)(config, &payload)?;

    let response = adapter.send(&message).await?;
    info!(
        source = handler.key,
        adapter = adapter.kind(),
        status = response.status,
        "delivered notification"
    );
    Ok(response)
}
