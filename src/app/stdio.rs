//! Line-oriented stdio bridge for running the application as a process.
//!
//! Input lines starting with `{` are tagged JSON commands:
//!
//! ```text
//! {"port":"send_message","value":"ready"}
//! {"port":"send_move","value":"e2e4"}
//! {"port":"chat","text":"good luck"}
//! ```
//!
//! In the chat variant any other non-empty line is typed into the chat input
//! and submitted with `Enter`. Inbound values are written out as one compact
//! JSON value per line.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::chat::{ChatInput, SUBMIT_KEY};
use super::ports::AppSender;
use crate::domain::{AppCommand, RelayVariant};
use crate::error::RelayError;

/// Reads commands from `reader` until EOF and emits them on `sender`.
///
/// Malformed lines are logged and skipped.
///
/// # Errors
///
/// Returns [`RelayError::Io`] if reading fails, or
/// [`RelayError::ChannelClosed`] if the relay is gone.
pub async fn pump_commands<R>(
    reader: R,
    sender: AppSender,
    variant: RelayVariant,
) -> Result<(), RelayError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut chat_input = ChatInput::new();

    while let Some(line) = lines.next_line().await? {
        if let Some(command) = parse_line(&line, variant, &mut chat_input) {
            sender.send(command).await?;
        }
    }

    tracing::debug!("application input closed");
    Ok(())
}

/// Writes every inbound value to `writer` as a JSON line until the relay
/// stops delivering.
///
/// # Errors
///
/// Returns [`RelayError::Io`] if writing fails, or [`RelayError::Codec`] if a
/// value cannot be serialized.
pub async fn pump_inbound<W>(
    mut inbound: mpsc::Receiver<Value>,
    mut writer: W,
) -> Result<(), RelayError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(value) = inbound.recv().await {
        let mut line = serde_json::to_vec(&value)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Turns one input line into a command, if it is one.
fn parse_line(line: &str, variant: RelayVariant, chat_input: &mut ChatInput) -> Option<AppCommand> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('{') {
        return match serde_json::from_str::<AppCommand>(trimmed) {
            Ok(command) => Some(command),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed command line");
                None
            }
        };
    }

    if variant.has_chat() {
        chat_input.type_text(trimmed);
        return chat_input
            .key_press(SUBMIT_KEY)
            .map(|text| AppCommand::Chat { text });
    }

    tracing::debug!("ignoring plain text line without chat");
    None
}
