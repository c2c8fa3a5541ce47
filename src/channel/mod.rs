//! Channel layer: Phoenix frames, the socket transport, and the
//! message-passing handle the relay talks to.
//!
//! One socket carries one joined topic for the lifetime of the relay.

pub mod frame;
pub mod handle;
pub mod socket;

pub use frame::Frame;
pub use handle::{ChannelEvent, ChannelHandle, JoinOutcome, TransportEnds, channel_pair};
pub use socket::{connect, socket_url};
