//! Socket transport task.
//!
//! Owns the websocket for the lifetime of the relay: sends the single join,
//! turns queued [`ChannelPush`]es into frames, keeps the socket alive with
//! heartbeats, and reports replies and events on the joined topic through
//! the [`ChannelHandle`]'s event stream. There is no reconnection: when the
//! socket closes, the event stream ends.

use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_tungstenite::tungstenite::{self, Message};
use url::Url;

use super::frame::{Frame, PHX_CLOSE, PHX_ERROR, PHX_REPLY, RefCounter, Reply};
use super::handle::{ChannelEvent, ChannelHandle, JoinOutcome, TransportEnds, channel_pair};
use crate::domain::{ChannelPush, InboundEvent};
use crate::error::RelayError;

/// Protocol version requested from the server.
pub const PROTOCOL_VSN: &str = "2.0.0";

/// Builds the socket URL with the protocol version and optional user token
/// as query parameters.
///
/// # Errors
///
/// Returns [`RelayError::InvalidUrl`] if `base` is not a valid URL.
pub fn socket_url(base: &str, user_token: Option<&str>) -> Result<Url, RelayError> {
    let mut url = Url::parse(base)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("vsn", PROTOCOL_VSN);
        if let Some(token) = user_token {
            query.append_pair("token", token);
        }
    }
    Ok(url)
}

/// Connects to `url`, spawns the transport task, and returns the handle.
///
/// The join request is the first frame the task sends.
///
/// # Errors
///
/// Returns [`RelayError::WebSocket`] if the websocket handshake fails.
pub async fn connect(
    url: &Url,
    topic: String,
    heartbeat: Duration,
    capacity: usize,
) -> Result<(ChannelHandle, JoinHandle<()>), RelayError> {
    let (socket, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
    tracing::info!(url = %url, %topic, "socket connected");

    let (handle, ends) = channel_pair(topic.clone(), capacity);
    let task = tokio::spawn(run_transport(socket, topic, ends, heartbeat));
    Ok((handle, task))
}

/// Runs the read/write loop for one socket and one joined topic.
///
/// - Sends the join, then forwards queued pushes in order.
/// - Sends a heartbeat every `heartbeat`.
/// - Reports the join reply and every other event on `topic`.
///
/// Returns when the socket closes or the relay drops its handle.
pub async fn run_transport<S>(socket: S, topic: String, ends: TransportEnds, heartbeat: Duration)
where
    S: Stream<Item = Result<Message, tungstenite::Error>>
        + Sink<Message, Error = tungstenite::Error>
        + Unpin,
{
    let (mut ws_tx, mut ws_rx) = socket.split();
    let TransportEnds { mut pushes, events } = ends;
    let mut refs = RefCounter::default();

    let join_ref = refs.next_ref();
    if let Err(err) = send_frame(&mut ws_tx, &Frame::join(&topic, &join_ref)).await {
        tracing::warn!(%topic, error = %err, "failed to send join");
        return;
    }
    tracing::debug!(%topic, %join_ref, "join sent");

    let heartbeat = heartbeat.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + heartbeat, heartbeat);
    let mut pushes_open = true;

    loop {
        tokio::select! {
            // Incoming frame from the server
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if !dispatch_frame(text.as_str(), &topic, &join_ref, &events) {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::warn!(%topic, error = %err, "socket read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Push queued by the relay
            push = pushes.recv(), if pushes_open => {
                match push {
                    Some(push) => {
                        let reference = refs.next_ref();
                        if let Err(err) = send_push(&mut ws_tx, &join_ref, &reference, &topic, &push).await {
                            tracing::warn!(%topic, event = %push.event, error = %err, "push failed");
                            if matches!(err, RelayError::WebSocket(_)) {
                                break;
                            }
                        }
                    }
                    None => pushes_open = false,
                }
            }
            _ = ticker.tick() => {
                let reference = refs.next_ref();
                if let Err(err) = send_frame(&mut ws_tx, &Frame::heartbeat(&reference)).await {
                    tracing::warn!(error = %err, "heartbeat failed");
                    break;
                }
            }
            // Relay dropped its handle
            () = events.closed() => break,
        }
    }

    let _ = ws_tx.close().await;
    tracing::debug!(%topic, "socket closed");
}

/// Routes one text frame. Returns `false` once the relay is gone.
fn dispatch_frame(
    text: &str,
    topic: &str,
    join_ref: &str,
    events: &mpsc::UnboundedSender<ChannelEvent>,
) -> bool {
    let frame = match Frame::decode(text) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(error = %err, "skipping malformed frame");
            return true;
        }
    };

    if frame.topic != topic {
        tracing::trace!(topic = %frame.topic, event = %frame.event, "frame for other topic");
        return true;
    }

    let event = match frame.event.as_str() {
        PHX_REPLY if frame.reference.as_deref() == Some(join_ref) => match frame.reply() {
            Some(Reply::Ok(response)) => ChannelEvent::Joined(JoinOutcome::Ok(response)),
            Some(Reply::Error(response)) => ChannelEvent::Joined(JoinOutcome::Error(response)),
            None => return true,
        },
        PHX_REPLY => {
            tracing::trace!(%topic, reference = ?frame.reference, "push reply");
            return true;
        }
        PHX_ERROR | PHX_CLOSE => {
            tracing::warn!(%topic, event = %frame.event, "channel reported {}", frame.event);
            return true;
        }
        _ => {
            tracing::debug!(%topic, event = %frame.event, "inbound event");
            ChannelEvent::Event(InboundEvent::new(frame.event, frame.payload))
        }
    };

    events.send(event).is_ok()
}

/// Encodes a relay push into a frame on the joined topic and sends it.
async fn send_push<S>(
    tx: &mut S,
    join_ref: &str,
    reference: &str,
    topic: &str,
    push: &ChannelPush,
) -> Result<(), RelayError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let payload = push.payload()?;
    tracing::debug!(%topic, event = %push.event, %reference, "outbound push");
    send_frame(tx, &Frame::push(join_ref, reference, topic, &push.event, payload)).await
}

async fn send_frame<S>(tx: &mut S, frame: &Frame) -> Result<(), RelayError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let text = frame.encode()?;
    tx.send(Message::text(text)).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn socket_url_carries_version_and_token() {
        let Ok(url) = socket_url("ws://localhost:4000/socket/websocket", Some("abc")) else {
            panic!("valid url");
        };
        assert_eq!(
            url.as_str(),
            "ws://localhost:4000/socket/websocket?vsn=2.0.0&token=abc"
        );
    }

    #[test]
    fn socket_url_without_token() {
        let Ok(url) = socket_url("ws://localhost:4000/socket/websocket", None) else {
            panic!("valid url");
        };
        assert_eq!(url.query(), Some("vsn=2.0.0"));
    }

    #[test]
    fn socket_url_rejects_garbage() {
        assert!(matches!(
            socket_url("not a url", None),
            Err(RelayError::InvalidUrl(_))
        ));
    }

    fn encoded(frame: &Frame) -> String {
        let Ok(text) = frame.encode() else {
            panic!("frame encodes");
        };
        text
    }

    #[tokio::test]
    async fn join_reply_is_reported() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reply = Frame {
            join_ref: Some("1".into()),
            reference: Some("1".into()),
            topic: "room:42:7".into(),
            event: PHX_REPLY.into(),
            payload: json!({"status": "ok", "response": {}}),
        };
        assert!(dispatch_frame(&encoded(&reply), "room:42:7", "1", &tx));
        assert_eq!(
            rx.recv().await,
            Some(ChannelEvent::Joined(JoinOutcome::Ok(json!({}))))
        );
    }

    #[tokio::test]
    async fn rejected_join_is_reported_as_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reply = Frame {
            join_ref: Some("1".into()),
            reference: Some("1".into()),
            topic: "room:42:7".into(),
            event: PHX_REPLY.into(),
            payload: json!({"status": "error", "response": {"reason": "unmatched topic"}}),
        };
        assert!(dispatch_frame(&encoded(&reply), "room:42:7", "1", &tx));
        assert_eq!(
            rx.recv().await,
            Some(ChannelEvent::Joined(JoinOutcome::Error(
                json!({"reason": "unmatched topic"})
            )))
        );
    }

    #[tokio::test]
    async fn push_replies_and_foreign_topics_are_skipped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let push_reply = Frame {
            join_ref: Some("1".into()),
            reference: Some("2".into()),
            topic: "room:42:7".into(),
            event: PHX_REPLY.into(),
            payload: json!({"status": "ok", "response": {}}),
        };
        let heartbeat_reply = Frame {
            topic: "phoenix".into(),
            ..push_reply.clone()
        };
        assert!(dispatch_frame(&encoded(&push_reply), "room:42:7", "1", &tx));
        assert!(dispatch_frame(&encoded(&heartbeat_reply), "room:42:7", "1", &tx));
        assert!(dispatch_frame("not json", "room:42:7", "1", &tx));
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn events_are_forwarded_untouched() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let text = r#"[null,null,"room:42:7","game_state",{"body":{"fen":"8/8"}}]"#;
        assert!(dispatch_frame(text, "room:42:7", "1", &tx));
        assert_eq!(
            rx.recv().await,
            Some(ChannelEvent::Event(InboundEvent::new(
                "game_state",
                json!({"body": {"fen": "8/8"}})
            )))
        );
    }

    #[test]
    fn channel_errors_and_closes_are_not_forwarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for event in [PHX_ERROR, PHX_CLOSE] {
            let frame = Frame {
                join_ref: Some("1".into()),
                reference: Some("1".into()),
                topic: "room:42:7".into(),
                event: event.into(),
                payload: json!({}),
            };
            assert!(dispatch_frame(&encoded(&frame), "room:42:7", "1", &tx));
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dispatch_stops_once_relay_is_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let text = r#"[null,null,"room:42","game_state",{"body":1}]"#;
        assert!(!dispatch_frame(text, "room:42", "1", &tx));
    }
}
