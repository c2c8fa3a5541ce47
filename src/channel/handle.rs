//! Message-passing handle to a joined channel.
//!
//! The transport task owns the socket; the relay only ever sees a
//! [`ChannelHandle`]: a stream of [`ChannelEvent`]s in, a sink of
//! [`ChannelPush`]es out. [`channel_pair`] builds both ends, which also lets
//! tests stand in for the transport.
//!
//! The event stream is unbounded so the transport never waits on the relay:
//! it must keep draining pushes and sending heartbeats while the relay is
//! itself waiting to queue a push.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::domain::{ChannelPush, InboundEvent};
use crate::error::RelayError;

/// Result of the single join request.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    /// The server accepted the join.
    Ok(Value),
    /// The server rejected the join.
    Error(Value),
}

/// Something the transport observed on the joined topic.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The server answered the join request.
    Joined(JoinOutcome),
    /// The server pushed an event.
    Event(InboundEvent),
}

/// Relay-side end of a channel.
#[derive(Debug)]
pub struct ChannelHandle {
    topic: String,
    pushes: mpsc::Sender<ChannelPush>,
    events: mpsc::UnboundedReceiver<ChannelEvent>,
}

/// Transport-side end of a channel.
#[derive(Debug)]
pub struct TransportEnds {
    /// Pushes queued by the relay, in order.
    pub pushes: mpsc::Receiver<ChannelPush>,
    /// Where the transport reports what it receives.
    pub events: mpsc::UnboundedSender<ChannelEvent>,
}

/// Creates a connected handle/transport pair for `topic`. `capacity` bounds
/// the push queue only.
#[must_use]
pub fn channel_pair(topic: impl Into<String>, capacity: usize) -> (ChannelHandle, TransportEnds) {
    let capacity = capacity.max(1);
    let (push_tx, push_rx) = mpsc::channel(capacity);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        ChannelHandle {
            topic: topic.into(),
            pushes: push_tx,
            events: event_rx,
        },
        TransportEnds {
            pushes: push_rx,
            events: event_tx,
        },
    )
}

impl ChannelHandle {
    /// Returns the joined topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Queues a push for the transport.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ChannelClosed`] if the transport has stopped.
    pub async fn push(&self, push: ChannelPush) -> Result<(), RelayError> {
        self.pushes
            .send(push)
            .await
            .map_err(|_| RelayError::ChannelClosed("channel transport"))
    }

    /// Waits for the next event. Returns `None` once the socket is gone.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        self.events.recv().await
    }
}
