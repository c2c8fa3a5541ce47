//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The room and player identifiers play
//! the part of the data attributes an embedding page would provide.

use std::time::Duration;

use crate::domain::{PlayerId, RelayVariant, RoomId, SessionIdentity, TopicScope};
use crate::error::RelayError;

/// Default socket endpoint of a local development server.
pub const DEFAULT_SOCKET_URL: &str = "ws://localhost:4000/socket/websocket";

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Websocket endpoint, without query parameters.
    pub socket_url: String,

    /// Token forwarded to the server as the `token` connection parameter.
    pub user_token: Option<String>,

    /// Room (game) identifier.
    pub room_id: RoomId,

    /// Local player identifier.
    pub player_id: PlayerId,

    /// Plain or chat relay.
    pub variant: RelayVariant,

    /// Whether the topic is per room or per player.
    pub topic_scope: TopicScope,

    /// Interval between socket heartbeats.
    pub heartbeat_interval: Duration,

    /// Capacity of the channel and port queues.
    pub port_capacity: usize,

    /// Emit logs as JSON instead of human-readable text.
    pub log_json: bool,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// See [`RelayConfig::from_lookup`].
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Numeric settings fall back to their defaults when missing or
    /// unparsable.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MissingSetting`] if `RELAY_ROOM_ID` is not set,
    /// or [`RelayError::InvalidSetting`] if `RELAY_VARIANT` or
    /// `RELAY_TOPIC_SCOPE` holds an unknown value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let socket_url =
            lookup("RELAY_SOCKET_URL").unwrap_or_else(|| DEFAULT_SOCKET_URL.to_string());
        let user_token = lookup("RELAY_USER_TOKEN").filter(|token| !token.is_empty());

        let room_id = lookup("RELAY_ROOM_ID")
            .map(RoomId::new)
            .ok_or(RelayError::MissingSetting("RELAY_ROOM_ID"))?;
        let player_id = PlayerId::new(lookup("RELAY_PLAYER_ID").unwrap_or_default());

        let variant = parse_choice(&lookup, "RELAY_VARIANT", RelayVariant::default())?;
        let topic_scope = parse_choice(&lookup, "RELAY_TOPIC_SCOPE", TopicScope::default())?;

        let heartbeat_interval =
            Duration::from_secs(parse_setting(&lookup, "RELAY_HEARTBEAT_SECS", 30_u64).max(1));
        let port_capacity = parse_setting(&lookup, "RELAY_PORT_CAPACITY", 256_usize).max(1);
        let log_json = parse_setting_bool(&lookup, "RELAY_LOG_JSON", false);

        Ok(Self {
            socket_url,
            user_token,
            room_id,
            player_id,
            variant,
            topic_scope,
            heartbeat_interval,
            port_capacity,
            log_json,
        })
    }

    /// Builds the session identity for the configured room, player and
    /// topic scope.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::EmptyIdentifier`] if an identifier the scope
    /// needs is empty.
    pub fn identity(&self) -> Result<SessionIdentity, RelayError> {
        SessionIdentity::new(
            self.room_id.clone(),
            self.player_id.clone(),
            self.topic_scope,
        )
    }
}

/// Parses a setting as `T`, returning `default` on missing or invalid
/// values.
fn parse_setting<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses a setting as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_setting_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

/// Parses an enumerated setting. Unlike numeric settings, an unknown value
/// is an error rather than a silent fallback.
fn parse_choice<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, RelayError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| RelayError::InvalidSetting { key, value }),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<RelayConfig, RelayError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RelayConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_room_is_set() {
        let Ok(config) = load(&[("RELAY_ROOM_ID", "42")]) else {
            panic!("config loads");
        };
        assert_eq!(config.socket_url, DEFAULT_SOCKET_URL);
        assert_eq!(config.user_token, None);
        assert_eq!(config.variant, RelayVariant::Plain);
        assert_eq!(config.topic_scope, TopicScope::RoomAndPlayer);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(config.port_capacity, 256);
        assert!(!config.log_json);
    }

    #[test]
    fn missing_room_is_an_error() {
        assert!(matches!(
            load(&[]),
            Err(RelayError::MissingSetting("RELAY_ROOM_ID"))
        ));
    }

    #[test]
    fn unknown_variant_is_an_error() {
        let result = load(&[("RELAY_ROOM_ID", "42"), ("RELAY_VARIANT", "video")]);
        assert!(matches!(
            result,
            Err(RelayError::InvalidSetting {
                key: "RELAY_VARIANT",
                ..
            })
        ));
    }

    #[test]
    fn explicit_settings_are_read() {
        let Ok(config) = load(&[
            ("RELAY_ROOM_ID", "42"),
            ("RELAY_PLAYER_ID", "7"),
            ("RELAY_VARIANT", "chat"),
            ("RELAY_TOPIC_SCOPE", "room"),
            ("RELAY_USER_TOKEN", "secret"),
            ("RELAY_HEARTBEAT_SECS", "5"),
            ("RELAY_PORT_CAPACITY", "not-a-number"),
            ("RELAY_LOG_JSON", "TRUE"),
        ]) else {
            panic!("config loads");
        };
        assert_eq!(config.variant, RelayVariant::Chat);
        assert_eq!(config.topic_scope, TopicScope::Room);
        assert_eq!(config.user_token.as_deref(), Some("secret"));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(5));
        assert_eq!(config.port_capacity, 256);
        assert!(config.log_json);

        let Ok(identity) = config.identity() else {
            panic!("identity builds");
        };
        assert_eq!(identity.topic(), "room:42");
    }

    #[test]
    fn player_scope_without_player_fails_identity() {
        let Ok(config) = load(&[("RELAY_ROOM_ID", "42")]) else {
            panic!("config loads");
        };
        assert!(matches!(
            config.identity(),
            Err(RelayError::EmptyIdentifier("player"))
        ));
    }
}
