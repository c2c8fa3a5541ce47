//! Events flowing through the relay.
//!
//! [`InboundEvent`] is what the server pushes over the channel,
//! [`AppCommand`] is what the application emits on its outbound ports, and
//! [`ChannelPush`] is what the relay asks the channel to send.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PlayerId, RoomId};

/// Inbound event kind carrying a full game state.
pub const GAME_STATE: &str = "game_state";
/// Inbound (and chat outbound) event kind carrying a chat line.
pub const NEW_MSG: &str = "new_msg";
/// Outbound event kind signalling the player is ready.
pub const READY: &str = "ready";
/// Outbound event kind carrying a move.
pub const MOVE: &str = "move";

/// A server event received on the joined topic.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Event name, e.g. `game_state`.
    pub kind: String,
    /// Raw event payload.
    pub payload: Value,
}

impl InboundEvent {
    /// Creates an inbound event.
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Returns `payload.body`, or `null` when the payload carries none.
    #[must_use]
    pub fn body(&self) -> Value {
        self.payload.get("body").cloned().unwrap_or(Value::Null)
    }
}

/// A message emitted by the application on one of its outbound ports.
///
/// Also the wire shape of JSON commands read by the stdio bridge:
/// `{"port":"send_move","value":"e2e4"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", rename_all = "snake_case")]
pub enum AppCommand {
    /// Generic message port.
    SendMessage {
        /// Opaque message value.
        value: Value,
    },
    /// Dedicated move port.
    SendMove {
        /// Opaque move value.
        value: Value,
    },
    /// Chat input submission.
    Chat {
        /// Text taken from the chat input.
        text: String,
    },
}

impl AppCommand {
    /// Returns the port name, for logging.
    #[must_use]
    pub const fn port(&self) -> &'static str {
        match self {
            Self::SendMessage { .. } => "send_message",
            Self::SendMove { .. } => "send_move",
            Self::Chat { .. } => "chat",
        }
    }
}

/// Identifiers attached to every game push, with an optional move.
///
/// Serialized with the server's key names:
/// `{"game_id": .., "player_id": .., "move": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushPayload {
    /// Room the push belongs to.
    #[serde(rename = "game_id")]
    pub room: RoomId,
    /// Player sending the push.
    #[serde(rename = "player_id")]
    pub player: PlayerId,
    /// Move value, only present on `move` pushes.
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_value: Option<Value>,
}

/// Payload of an outbound push.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PushBody {
    /// Room/player identifiers, optionally with a move.
    Session(PushPayload),
    /// Chat line typed by the local player.
    Chat {
        /// Chat text.
        body: String,
    },
}

/// An outbound push the relay hands to the channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPush {
    /// Event name.
    pub event: String,
    /// Event payload.
    pub body: PushBody,
}

impl ChannelPush {
    /// Serializes the payload for the wire.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the payload cannot be represented
    /// as JSON.
    pub fn payload(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.body)
    }
}
