//! Pure routing between the channel and the application ports.
//!
//! No I/O happens here: [`route_inbound`] decides what an inbound event does
//! to the application, [`route_outbound`] decides what an application
//! command pushes onto the channel. Bodies and move values pass through
//! untouched.

use serde_json::Value;

use crate::domain::event::{MOVE, NEW_MSG, READY};
use crate::domain::{
    AppCommand, ChannelPush, InboundEvent, PushBody, PushPayload, RelayVariant, SessionIdentity,
};

/// What the relay does with an inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundAction {
    /// Deliver the body to the application's inbound port.
    Deliver(Value),
    /// Append the body to the message list, then deliver it.
    AppendAndDeliver(Value),
    /// The variant does not subscribe to this event.
    Ignore,
}

/// Routes an inbound event according to `variant`.
#[must_use]
pub fn route_inbound(variant: RelayVariant, event: &InboundEvent) -> InboundAction {
    if !variant.subscribes_to(&event.kind) {
        return InboundAction::Ignore;
    }
    match event.kind.as_str() {
        NEW_MSG => InboundAction::AppendAndDeliver(event.body()),
        _ => InboundAction::Deliver(event.body()),
    }
}

/// Routes an application command according to `variant`.
///
/// Returns `None` for chat submissions in the plain variant, which has no
/// chat input.
#[must_use]
pub fn route_outbound(
    variant: RelayVariant,
    identity: &SessionIdentity,
    command: AppCommand,
) -> Option<ChannelPush> {
    match (variant, command) {
        (RelayVariant::Chat, AppCommand::SendMessage { value }) if is_ready(&value) => {
            Some(session_push(identity, READY, None))
        }
        (RelayVariant::Chat, AppCommand::SendMessage { value })
        | (_, AppCommand::SendMove { value }) => Some(session_push(identity, MOVE, Some(value))),
        (RelayVariant::Plain, AppCommand::SendMessage { value }) => {
            Some(session_push(identity, &event_name(&value), None))
        }
        (RelayVariant::Chat, AppCommand::Chat { text }) => Some(ChannelPush {
            event: NEW_MSG.to_string(),
            body: PushBody::Chat { body: text },
        }),
        (RelayVariant::Plain, AppCommand::Chat { .. }) => None,
    }
}

/// Event name for a plain-variant generic message: the message itself.
///
/// Strings are used verbatim; other values use their compact JSON text.
#[must_use]
pub fn event_name(value: &Value) -> String {
    match value {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}

fn is_ready(value: &Value) -> bool {
    value.as_str() == Some(READY)
}

fn session_push(identity: &SessionIdentity, event: &str, move_value: Option<Value>) -> ChannelPush {
    ChannelPush {
        event: event.to_string(),
        body: PushBody::Session(PushPayload {
            room: identity.room().clone(),
            player: identity.player().clone(),
            move_value,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{PlayerId, RoomId, TopicScope};
    use serde_json::json;

    fn identity() -> SessionIdentity {
        let Ok(identity) = SessionIdentity::new(
            RoomId::new("42"),
            PlayerId::new("7"),
            TopicScope::RoomAndPlayer,
        ) else {
            panic!("valid identity");
        };
        identity
    }

    fn wire(push: &ChannelPush) -> (String, Value) {
        let Ok(payload) = push.payload() else {
            panic!("payload serializes");
        };
        (push.event.clone(), payload)
    }

    fn routed(variant: RelayVariant, command: AppCommand) -> (String, Value) {
        let Some(push) = route_outbound(variant, &identity(), command) else {
            panic!("expected a push");
        };
        wire(&push)
    }

    #[test]
    fn game_state_body_passes_through_in_both_variants() {
        let body = json!({"board": [["r", "n"], ["P", "K"]], "turn": 12});
        let event = InboundEvent::new("game_state", json!({"body": body.clone()}));
        for variant in [RelayVariant::Plain, RelayVariant::Chat] {
            assert_eq!(
                route_inbound(variant, &event),
                InboundAction::Deliver(body.clone())
            );
        }
    }

    #[test]
    fn new_msg_appends_only_in_chat_variant() {
        let event = InboundEvent::new("new_msg", json!({"body": "hello"}));
        assert_eq!(
            route_inbound(RelayVariant::Chat, &event),
            InboundAction::AppendAndDeliver(json!("hello"))
        );
        assert_eq!(
            route_inbound(RelayVariant::Plain, &event),
            InboundAction::Ignore
        );
    }

    #[test]
    fn unknown_events_are_ignored() {
        let event = InboundEvent::new("presence_diff", json!({}));
        assert_eq!(
            route_inbound(RelayVariant::Chat, &event),
            InboundAction::Ignore
        );
    }

    #[test]
    fn routes_exactly_the_subscribed_events() {
        for variant in [RelayVariant::Plain, RelayVariant::Chat] {
            for kind in ["game_state", "new_msg", "presence_state"] {
                let event = InboundEvent::new(kind, json!({"body": kind}));
                let routed = route_inbound(variant, &event) != InboundAction::Ignore;
                assert_eq!(routed, variant.subscribed_events().contains(&kind));
            }
        }
    }

    #[test]
    fn chat_ready_pushes_ready_without_move() {
        let (event, payload) = routed(
            RelayVariant::Chat,
            AppCommand::SendMessage {
                value: json!("ready"),
            },
        );
        assert_eq!(event, "ready");
        assert_eq!(payload, json!({"game_id": "42", "player_id": "7"}));
    }

    #[test]
    fn chat_other_messages_push_move() {
        let (event, payload) = routed(
            RelayVariant::Chat,
            AppCommand::SendMessage {
                value: json!("resign"),
            },
        );
        assert_eq!(event, "move");
        assert_eq!(
            payload,
            json!({"game_id": "42", "player_id": "7", "move": "resign"})
        );
    }

    #[test]
    fn chat_ready_must_be_exact_string() {
        let (event, _) = routed(
            RelayVariant::Chat,
            AppCommand::SendMessage {
                value: json!("Ready"),
            },
        );
        assert_eq!(event, "move");

        let (event, payload) = routed(
            RelayVariant::Chat,
            AppCommand::SendMessage {
                value: json!({"ready": true}),
            },
        );
        assert_eq!(event, "move");
        assert_eq!(payload.get("move"), Some(&json!({"ready": true})));
    }

    #[test]
    fn move_port_pushes_move_in_both_variants() {
        for variant in [RelayVariant::Plain, RelayVariant::Chat] {
            let (event, payload) = routed(
                variant,
                AppCommand::SendMove {
                    value: json!("e2e4"),
                },
            );
            assert_eq!(event, "move");
            assert_eq!(
                payload,
                json!({"game_id": "42", "player_id": "7", "move": "e2e4"})
            );
        }
    }

    #[test]
    fn plain_message_becomes_event_name() {
        let (event, payload) = routed(
            RelayVariant::Plain,
            AppCommand::SendMessage {
                value: json!("ready"),
            },
        );
        assert_eq!(event, "ready");
        assert_eq!(payload, json!({"game_id": "42", "player_id": "7"}));

        let (event, payload) = routed(
            RelayVariant::Plain,
            AppCommand::SendMessage {
                value: json!("resign"),
            },
        );
        assert_eq!(event, "resign");
        assert_eq!(payload, json!({"game_id": "42", "player_id": "7"}));
    }

    #[test]
    fn plain_non_string_message_uses_json_text() {
        assert_eq!(event_name(&json!(3)), "3");
        assert_eq!(event_name(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn chat_submission_pushes_new_msg() {
        let (event, payload) = routed(
            RelayVariant::Chat,
            AppCommand::Chat {
                text: "gg".to_string(),
            },
        );
        assert_eq!(event, "new_msg");
        assert_eq!(payload, json!({"body": "gg"}));

        assert_eq!(
            route_outbound(
                RelayVariant::Plain,
                &identity(),
                AppCommand::Chat {
                    text: "gg".to_string()
                }
            ),
            None
        );
    }
}
