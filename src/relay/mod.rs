//! Relay layer: pure routing plus the owned session that drives it.
//!
//! ```text
//! server ──► ChannelHandle ──► route_inbound ──► RelayPorts ──► application
//! server ◄── ChannelHandle ◄── route_outbound ◄── RelayPorts ◄── application
//! ```

pub mod mapping;
pub mod session;

pub use mapping::{InboundAction, route_inbound, route_outbound};
pub use session::{RelaySession, SessionSummary};
