//! Phoenix V2 wire frames.
//!
//! Every message on the socket is a five-element JSON array:
//!
//! ```text
//! [join_ref, ref, topic, event, payload]
//! ```
//!
//! `join_ref` ties a frame to a particular join of a topic, `ref` correlates
//! a request with its `phx_reply`. Server broadcasts carry `null` for both.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Event name of a join request.
pub const PHX_JOIN: &str = "phx_join";
/// Event name of a reply to a request.
pub const PHX_REPLY: &str = "phx_reply";
/// Event name the server uses when a channel crashes.
pub const PHX_ERROR: &str = "phx_error";
/// Event name the server uses when a channel is closed.
pub const PHX_CLOSE: &str = "phx_close";
/// Topic reserved for socket-level heartbeats.
pub const HEARTBEAT_TOPIC: &str = "phoenix";
/// Event name of a heartbeat.
pub const HEARTBEAT: &str = "heartbeat";

/// A single decoded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFrame", into = "RawFrame")]
pub struct Frame {
    /// Ref of the join this frame belongs to.
    pub join_ref: Option<String>,
    /// Request ref, echoed back in the matching reply.
    pub reference: Option<String>,
    /// Channel topic, e.g. `room:42:7`.
    pub topic: String,
    /// Event name.
    pub event: String,
    /// Event payload.
    pub payload: Value,
}

#[derive(Serialize, Deserialize)]
struct RawFrame(Option<String>, Option<String>, String, String, Value);

impl From<RawFrame> for Frame {
    fn from(RawFrame(join_ref, reference, topic, event, payload): RawFrame) -> Self {
        Self {
            join_ref,
            reference,
            topic,
            event,
            payload,
        }
    }
}

impl From<Frame> for RawFrame {
    fn from(frame: Frame) -> Self {
        Self(
            frame.join_ref,
            frame.reference,
            frame.topic,
            frame.event,
            frame.payload,
        )
    }
}

/// Status carried by a `phx_reply`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The request succeeded.
    Ok(Value),
    /// The request was rejected.
    Error(Value),
}

impl Frame {
    /// Builds the join request for `topic`. A join uses its own ref as
    /// `join_ref`.
    #[must_use]
    pub fn join(topic: &str, reference: &str) -> Self {
        Self {
            join_ref: Some(reference.to_string()),
            reference: Some(reference.to_string()),
            topic: topic.to_string(),
            event: PHX_JOIN.to_string(),
            payload: json!({}),
        }
    }

    /// Builds a push on a joined topic.
    #[must_use]
    pub fn push(join_ref: &str, reference: &str, topic: &str, event: &str, payload: Value) -> Self {
        Self {
            join_ref: Some(join_ref.to_string()),
            reference: Some(reference.to_string()),
            topic: topic.to_string(),
            event: event.to_string(),
            payload,
        }
    }

    /// Builds a socket heartbeat.
    #[must_use]
    pub fn heartbeat(reference: &str) -> Self {
        Self {
            join_ref: None,
            reference: Some(reference.to_string()),
            topic: HEARTBEAT_TOPIC.to_string(),
            event: HEARTBEAT.to_string(),
            payload: json!({}),
        }
    }

    /// Decodes a text frame.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `text` is not a five-element frame.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Encodes the frame as JSON text.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the payload cannot be serialized.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Interprets a `phx_reply` payload. Returns `None` for other events.
    ///
    /// Anything but `"status": "ok"` counts as an error.
    #[must_use]
    pub fn reply(&self) -> Option<Reply> {
        if self.event != PHX_REPLY {
            return None;
        }
        let response = self.payload.get("response").cloned().unwrap_or(Value::Null);
        match self.payload.get("status").and_then(Value::as_str) {
            Some("ok") => Some(Reply::Ok(response)),
            _ => Some(Reply::Error(response)),
        }
    }
}

/// Monotonic generator of request refs (`"1"`, `"2"`, ...).
#[derive(Debug, Default)]
pub struct RefCounter {
    last: u64,
}

impl RefCounter {
    /// Returns the next ref.
    pub fn next_ref(&mut self) -> String {
        self.last = self.last.wrapping_add(1);
        self.last.to_string()
    }
}
