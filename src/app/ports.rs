//! Application port interface.
//!
//! The front-end application talks to the relay through two halves of a
//! pair of bounded `tokio::sync::mpsc` channels: the relay holds
//! [`RelayPorts`], the application holds an [`AppHandle`]. Everything the
//! application emits (generic messages, moves, chat submissions) travels
//! on a single command stream, so relay order equals emission order.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::domain::AppCommand;
use crate::error::RelayError;

/// Relay-side ports.
#[derive(Debug)]
pub struct RelayPorts {
    inbound: mpsc::Sender<Value>,
    commands: mpsc::Receiver<AppCommand>,
}

/// Application-side ports.
#[derive(Debug)]
pub struct AppHandle {
    sender: AppSender,
    inbound: mpsc::Receiver<Value>,
}

/// Cloneable sending half of the application's outbound ports.
#[derive(Debug, Clone)]
pub struct AppSender {
    commands: mpsc::Sender<AppCommand>,
}

/// Creates a connected pair of relay and application ports.
#[must_use]
pub fn app_ports(capacity: usize) -> (RelayPorts, AppHandle) {
    let capacity = capacity.max(1);
    let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
    let (command_tx, command_rx) = mpsc::channel(capacity);
    (
        RelayPorts {
            inbound: inbound_tx,
            commands: command_rx,
        },
        AppHandle {
            sender: AppSender {
                commands: command_tx,
            },
            inbound: inbound_rx,
        },
    )
}

impl RelayPorts {
    /// Delivers a value to the application's inbound port.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ChannelClosed`] if the application is gone.
    pub async fn deliver(&self, value: Value) -> Result<(), RelayError> {
        self.inbound
            .send(value)
            .await
            .map_err(|_| RelayError::ChannelClosed("application inbound port"))
    }

    /// Waits for the next command. Returns `None` once every sender is gone.
    pub async fn next_command(&mut self) -> Option<AppCommand> {
        self.commands.recv().await
    }
}

impl AppSender {
    /// Emits a value on the generic message port.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ChannelClosed`] if the relay is gone.
    pub async fn send_message(&self, value: Value) -> Result<(), RelayError> {
        self.send(AppCommand::SendMessage { value }).await
    }

    /// Emits a value on the move port.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ChannelClosed`] if the relay is gone.
    pub async fn send_move(&self, value: Value) -> Result<(), RelayError> {
        self.send(AppCommand::SendMove { value }).await
    }

    /// Submits a line typed into the chat input.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ChannelClosed`] if the relay is gone.
    pub async fn submit_chat(&self, text: String) -> Result<(), RelayError> {
        self.send(AppCommand::Chat { text }).await
    }

    /// Emits an already-built command.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ChannelClosed`] if the relay is gone.
    pub async fn send(&self, command: AppCommand) -> Result<(), RelayError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RelayError::ChannelClosed("relay command port"))
    }
}

impl AppHandle {
    /// Returns the sending half.
    #[must_use]
    pub const fn sender(&self) -> &AppSender {
        &self.sender
    }

    /// Waits for the next value on the inbound port.
    pub async fn recv(&mut self) -> Option<Value> {
        self.inbound.recv().await
    }

    /// Splits into the sending half and the inbound receiver so they can
    /// be driven from separate tasks.
    #[must_use]
    pub fn into_split(self) -> (AppSender, mpsc::Receiver<Value>) {
        (self.sender, self.inbound)
    }
}
