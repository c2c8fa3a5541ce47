//! Chat input and message list.
//!
//! Only used by the chat variant. [`ChatInput`] stands in for the page's
//! text field: typed text is buffered until `Enter`, which takes the text and
//! clears the field. A [`MessageList`] receives one formatted line per
//! inbound chat message.

use std::fmt;
use std::io::Write;

use chrono::{DateTime, TimeZone};
use serde_json::Value;

/// Key that submits the chat input.
pub const SUBMIT_KEY: &str = "Enter";

/// Sink for rendered chat lines.
pub trait MessageList {
    /// Appends one line.
    fn append(&mut self, line: String);
}

impl MessageList for Vec<String> {
    fn append(&mut self, line: String) {
        self.push(line);
    }
}

/// Message list that writes each line to an [`io::Write`](std::io::Write).
#[derive(Debug)]
pub struct WriterList<W> {
    writer: W,
}

impl<W: Write> WriterList<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageList for WriterList<W> {
    fn append(&mut self, line: String) {
        if let Err(err) = writeln!(self.writer, "{line}").and_then(|()| self.writer.flush()) {
            tracing::warn!(error = %err, "failed to write chat line");
        }
    }
}

/// Renders a chat line as `[<time>] <body>`.
///
/// `at` is the wall-clock time of rendering. String bodies are shown
/// verbatim, anything else as compact JSON.
#[must_use]
pub fn format_line<Tz>(at: &DateTime<Tz>, body: &Value) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let stamp = at.format("%Y-%m-%d %H:%M:%S");
    match body {
        Value::String(text) => format!("[{stamp}] {text}"),
        other => format!("[{stamp}] {other}"),
    }
}

/// Buffered chat text field.
#[derive(Debug, Default)]
pub struct ChatInput {
    buffer: String,
}

impl ChatInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends typed text.
    pub fn type_text(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Returns the current contents.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Handles a key press. `Enter` takes the buffered text and clears the
    /// input; every other key is ignored.
    pub fn key_press(&mut self, key: &str) -> Option<String> {
        (key == SUBMIT_KEY).then(|| std::mem::take(&mut self.buffer))
    }
}
