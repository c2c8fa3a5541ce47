//! The relay session: one owned object per joined channel.
//!
//! [`RelaySession`] holds the identity, the channel handle, the application
//! ports and the message list for as long as the socket lives. Its run loop
//! handles one inbound event or one application command at a time, to
//! completion, in arrival order.

use chrono::Local;

use super::mapping::{InboundAction, route_inbound, route_outbound};
use crate::app::chat::format_line;
use crate::app::{MessageList, RelayPorts};
use crate::channel::{ChannelEvent, ChannelHandle, JoinOutcome};
use crate::domain::{AppCommand, InboundEvent, RelayVariant, SessionIdentity};

/// Counters and the message list handed back when a session ends.
#[derive(Debug)]
pub struct SessionSummary<L> {
    /// Whether the join was accepted. `None` if no reply arrived.
    pub joined: Option<bool>,
    /// Values delivered to the application's inbound port.
    pub delivered: u64,
    /// Pushes handed to the channel.
    pub pushed: u64,
    /// The message list, with every line appended during the session.
    pub messages: L,
}

/// Bidirectional relay between one channel and one application.
#[derive(Debug)]
pub struct RelaySession<L> {
    identity: SessionIdentity,
    variant: RelayVariant,
    channel: ChannelHandle,
    ports: RelayPorts,
    messages: L,
    joined: Option<bool>,
    delivered: u64,
    pushed: u64,
}

enum Step {
    Channel(Option<ChannelEvent>),
    App(Option<AppCommand>),
}

impl<L: MessageList> RelaySession<L> {
    /// Creates a session over an already-connected channel.
    #[must_use]
    pub fn new(
        identity: SessionIdentity,
        variant: RelayVariant,
        channel: ChannelHandle,
        ports: RelayPorts,
        messages: L,
    ) -> Self {
        Self {
            identity,
            variant,
            channel,
            ports,
            messages,
            joined: None,
            delivered: 0,
            pushed: 0,
        }
    }

    /// Relays until the channel's event stream ends.
    ///
    /// If the application stops emitting commands, inbound events keep
    /// being relayed.
    pub async fn run(mut self) -> SessionSummary<L> {
        tracing::info!(
            topic = %self.channel.topic(),
            variant = %self.variant,
            "relay started"
        );
        let mut commands_open = true;

        loop {
            let step = tokio::select! {
                event = self.channel.next_event() => Step::Channel(event),
                command = self.ports.next_command(), if commands_open => Step::App(command),
            };

            match step {
                Step::Channel(Some(event)) => self.handle_channel_event(event).await,
                Step::Channel(None) => break,
                Step::App(Some(command)) => self.handle_command(command).await,
                Step::App(None) => {
                    tracing::debug!("application ports closed");
                    commands_open = false;
                }
            }
        }

        tracing::info!(
            topic = %self.channel.topic(),
            delivered = self.delivered,
            pushed = self.pushed,
            "relay stopped"
        );
        SessionSummary {
            joined: self.joined,
            delivered: self.delivered,
            pushed: self.pushed,
            messages: self.messages,
        }
    }

    async fn handle_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Joined(JoinOutcome::Ok(response)) => {
                self.joined = Some(true);
                tracing::info!(topic = %self.channel.topic(), %response, "joined successfully");
            }
            ChannelEvent::Joined(JoinOutcome::Error(response)) => {
                self.joined = Some(false);
                tracing::warn!(topic = %self.channel.topic(), %response, "unable to join");
            }
            ChannelEvent::Event(event) => self.handle_inbound(&event).await,
        }
    }

    async fn handle_inbound(&mut self, event: &InboundEvent) {
        let body = match route_inbound(self.variant, event) {
            InboundAction::Deliver(body) => body,
            InboundAction::AppendAndDeliver(body) => {
                self.messages.append(format_line(&Local::now(), &body));
                body
            }
            InboundAction::Ignore => {
                tracing::debug!(event = %event.kind, "event not subscribed");
                return;
            }
        };

        match self.ports.deliver(body).await {
            Ok(()) => self.delivered += 1,
            Err(err) => tracing::debug!(event = %event.kind, error = %err, "delivery dropped"),
        }
    }

    async fn handle_command(&mut self, command: AppCommand) {
        let port = command.port();
        let Some(push) = route_outbound(self.variant, &self.identity, command) else {
            tracing::debug!(port, "command has no route in this variant");
            return;
        };

        tracing::debug!(port, event = %push.event, "relaying application message");
        match self.channel.push(push).await {
            Ok(()) => self.pushed += 1,
            Err(err) => tracing::debug!(port, error = %err, "push dropped"),
        }
    }
}
