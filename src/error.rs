//! Relay error types.
//!
//! [`RelayError`] is the central error type for the relay. Startup failures
//! (configuration, identifiers, connecting the socket) are surfaced through
//! it; once the relay is running, the only protocol-level failure it observes
//! is a rejected join, which is logged rather than returned.

use tokio_tungstenite::tungstenite;

/// Relay error enum.
///
/// # Categories
///
/// | Variants                                        | Raised by            |
/// |-------------------------------------------------|----------------------|
/// | `MissingSetting`, `InvalidSetting`              | `config`             |
/// | `EmptyIdentifier`                               | `domain::identity`   |
/// | `InvalidUrl`, `WebSocket`                       | `channel::socket`    |
/// | `Codec`, `Io`                                   | frames, stdio bridge |
/// | `ChannelClosed`                                 | port and push sends  |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A required environment variable is not set.
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    /// An environment variable is set but cannot be parsed.
    #[error("invalid value {value:?} for setting {key}")]
    InvalidSetting {
        /// Name of the offending variable.
        key: &'static str,
        /// Raw value that failed to parse.
        value: String,
    },

    /// A room or player identifier is empty where the topic scope needs it.
    #[error("empty identifier: {0}")]
    EmptyIdentifier(&'static str),

    /// The socket URL could not be parsed.
    #[error("invalid socket url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The websocket handshake or transport failed.
    #[error("websocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// A frame or port message could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Reading from or writing to the application's streams failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The other end of an internal channel has gone away.
    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),
}

impl From<tungstenite::Error> for RelayError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}
