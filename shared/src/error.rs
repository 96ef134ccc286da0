use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed inbound frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),

    #[error("failed to encode outbound message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("websocket is not open")]
    Closed,

    #[error("websocket transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
