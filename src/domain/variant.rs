//! Relay variants.
//!
//! The relay ships in two flavors that differ in which inbound events they
//! listen for and in how the generic outbound port is pushed. Both
//! behaviors are kept as-is; callers pick one explicitly.

use std::fmt;
use std::str::FromStr;

use super::event::{GAME_STATE, NEW_MSG};

/// Which relay flavor a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayVariant {
    /// Game state only. Generic port messages are pushed with the message
    /// itself as the event name.
    #[default]
    Plain,
    /// Game state plus chat. Generic port messages are pushed as `ready` or
    /// `move`; `new_msg` events are also appended to the message list.
    Chat,
}

impl RelayVariant {
    /// Returns `true` if chat input and the message list are active.
    #[must_use]
    pub const fn has_chat(self) -> bool {
        matches!(self, Self::Chat)
    }

    /// Returns the inbound event kinds this variant subscribes to. Any
    /// other kind is ignored by the relay.
    #[must_use]
    pub const fn subscribed_events(self) -> &'static [&'static str] {
        match self {
            Self::Plain => &[GAME_STATE],
            Self::Chat => &[GAME_STATE, NEW_MSG],
        }
    }

    /// Returns `true` if inbound events of `kind` are relayed.
    #[must_use]
    pub fn subscribes_to(self, kind: &str) -> bool {
        self.subscribed_events().contains(&kind)
    }
}

impl FromStr for RelayVariant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "chat" => Ok(Self::Chat),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RelayVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::Chat => f.write_str("chat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_subscribes_to_new_msg() {
        assert!(RelayVariant::Chat.subscribed_events().contains(&"new_msg"));
        assert!(!RelayVariant::Plain.subscribed_events().contains(&"new_msg"));
    }

    #[test]
    fn parses_and_displays() {
        assert_eq!("Chat".parse::<RelayVariant>(), Ok(RelayVariant::Chat));
        assert_eq!(RelayVariant::Plain.to_string(), "plain");
        assert!("voice".parse::<RelayVariant>().is_err());
    }
}
