use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::json;

use chatrelay::adapters::{Adapter, AdapterResponse};
use chatrelay::config::Config;
use chatrelay::dispatch::{dispatch, InboundRequest};
use chatrelay::error::{RelayError, Result};
use chatrelay::handlers::HandlerRegistry;
use chatrelay::message::Message;

/// Test double that records every delivery instead of performing network I/O.
struct RecordingAdapter {
    calls: AtomicUsize,
    last_message: Mutex<Option<Message>>,
    status: u16,
}

impl RecordingAdapter {
    fn new(status: u16) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_message: Mutex::new(None),
            status,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Adapter for RecordingAdapter {
    fn kind(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, message: &Message) -> Result<AdapterResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().unwrap() = Some(message.clone());
        Ok(AdapterResponse {
            status: self.status,
            body: "ok".to_string(),
        })
    }
}

fn json_request(value: serde_json::Value) -> InboundRequest {
    InboundRequest::new(
        Some("application/json".to_string()),
        value.to_string().into_bytes(),
    )
}

#[tokio::test]
async fn test_dispatch_unknown_source_short_circuits() {
    let registry = HandlerRegistry::new();
    let config = Config::default();
    let adapter = RecordingAdapter::new(200);
    let request = json_request(json!({"title": "Build #12"}));

    let err = dispatch(&registry, &config, "unknown-source", &adapter, &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::UnknownSource(_)));
    assert_eq!(adapter.call_count(), 0);
}

#[tokio::test]
async fn test_dispatch_delivers_exactly_once() {
    let registry = HandlerRegistry::new();
    let config = Config::default();
    let adapter = RecordingAdapter::new(202);
    let request = json_request(json!({
        "title": "Build #12",
        "message": "Fix bug",
        "commit_url": "http://x/1",
        "author": "bob",
        "duration_string": "1m2s",
        "build_url": "http://x/build"
    }));

    let response = dispatch(&registry, &config, "magnumci", &adapter, &request)
        .await
        .unwrap();

    // The destination's raw status is forwarded unchanged.
    assert_eq!(response.status, 202);
    assert_eq!(adapter.call_count(), 1);

    let message = adapter.last_message.lock().unwrap().clone().unwrap();
    assert_eq!(message.activity, "Build #12");
    let fields = &message.attachments[0].fields;
    assert_eq!(fields[0].value, "[Fix bug](http://x/1)");
    assert_eq!(fields[1].value, "bob");
    assert_eq!(fields[2].value, "1m2s");
    assert_eq!(fields[3].value, "[View Build](http://x/build)");
}

#[tokio::test]
async fn test_dispatch_rejects_empty_notification() {
    let registry = HandlerRegistry::new();
    let config = Config::default();
    let adapter = RecordingAdapter::new(200);
    let request = json_request(json!({"branch": "main", "state": "finished"}));

    let err = dispatch(&registry, &config, "magnumci", &adapter, &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::ContentNotFound));
    assert_eq!(adapter.call_count(), 0);
}

#[tokio::test]
async fn test_dispatch_malformed_body_never_reaches_adapter() {
    let registry = HandlerRegistry::new();
    let config = Config::default();
    let adapter = RecordingAdapter::new(200);
    let request = InboundRequest::new(
        Some("application/json".to_string()),
        b"this is not json".to_vec(),
    );

    let err = dispatch(&registry, &config, "magnumci", &adapter, &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Decode(_)));
    assert_eq!(adapter.call_count(), 0);
}

#[tokio::test]
async fn test_dispatch_form_encoded_slack_payload() {
    let registry = HandlerRegistry::new();
    let config = Config::default();
    let adapter = RecordingAdapter::new(200);

    let inner = json!({"username": "bot", "icon_emoji": ":smile:", "text": "hi"}).to_string();
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("payload", &inner)
        .finish();
    let request = InboundRequest::new(
        Some("application/x-www-form-urlencoded".to_string()),
        body.into_bytes(),
    );

    dispatch(&registry, &config, "slack", &adapter, &request)
        .await
        .unwrap();

    let message = adapter.last_message.lock().unwrap().clone().unwrap();
    assert_eq!(message.activity, "bot");
    assert_eq!(message.body, "hi");
    assert!(message.icon_url.ends_with("/smile.png"));
}

#[tokio::test]
async fn test_normalize_is_pure_across_calls() {
    let registry = HandlerRegistry::new();
    let config = Config::default();
    let raw = json!({"check_name": "api.example.com", "current_state": "DOWN"}).to_string();
    let normalize = registry.get("pingdom").unwrap().normalize;

    let first = normalize(&config, raw.as_bytes()).unwrap();
    let second = normalize(&config, raw.as_bytes()).unwrap();

    assert_eq!(first, second);
}
