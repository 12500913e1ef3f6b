use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("JSON deserialization failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("payload malformed: {0}")]
    Payload(String),

    #[error("content not found")]
    ContentNotFound,

    #[error("no handler registered for source: {0}")]
    UnknownSource(String),

    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("outbound delivery failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
