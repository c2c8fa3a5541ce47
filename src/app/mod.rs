//! Application side of the relay: port interface, chat input and message
//! list, and the stdio bridge used by the binary.

pub mod chat;
pub mod ports;
pub mod stdio;

pub use chat::{ChatInput, MessageList, WriterList};
pub use ports::{AppHandle, AppSender, RelayPorts, app_ports};
