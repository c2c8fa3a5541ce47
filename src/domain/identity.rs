//! Room and player identity.
//!
//! [`RoomId`] and [`PlayerId`] are newtype wrappers around the opaque strings
//! the embedding page hands the relay, so a room can never be passed where a
//! player is expected. [`SessionIdentity`] pairs them and derives the channel
//! topic according to a [`TopicScope`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Identifier of the shared room (game) session.
///
/// Read once at startup and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps an externally supplied room identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the local participant within a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps an externally supplied player identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How narrowly the channel topic is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicScope {
    /// One channel per room: `room:<room>`.
    Room,
    /// One channel per player within a room: `room:<room>:<player>`.
    #[default]
    RoomAndPlayer,
}

impl FromStr for TopicScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "room" => Ok(Self::Room),
            "player" | "room_and_player" => Ok(Self::RoomAndPlayer),
            _ => Err(()),
        }
    }
}

/// The room/player pair attached to every outbound push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    room: RoomId,
    player: PlayerId,
    scope: TopicScope,
}

impl SessionIdentity {
    /// Builds the identity, checking the identifiers the scope depends on.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::EmptyIdentifier`] if the room is empty, or if
    /// the player is empty while `scope` is [`TopicScope::RoomAndPlayer`].
    pub fn new(room: RoomId, player: PlayerId, scope: TopicScope) -> Result<Self, RelayError> {
        if room.as_str().is_empty() {
            return Err(RelayError::EmptyIdentifier("room"));
        }
        if scope == TopicScope::RoomAndPlayer && player.as_str().is_empty() {
            return Err(RelayError::EmptyIdentifier("player"));
        }
        Ok(Self {
            room,
            player,
            scope,
        })
    }

    /// Returns the room identifier.
    #[must_use]
    pub const fn room(&self) -> &RoomId {
        &self.room
    }

    /// Returns the player identifier.
    #[must_use]
    pub const fn player(&self) -> &PlayerId {
        &self.player
    }

    /// Returns the topic the channel is joined on.
    #[must_use]
    pub fn topic(&self) -> String {
        match self.scope {
            TopicScope::Room => format!("room:{}", self.room),
            TopicScope::RoomAndPlayer => format!("room:{}:{}", self.room, self.player),
        }
    }
}
