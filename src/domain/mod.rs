//! Domain layer: identifiers, relay variants, and relay events.
//!
//! These types carry no I/O. The channel transport and the application
//! ports both speak in terms of them, and the relay mapping translates
//! between the two.

pub mod event;
pub mod identity;
pub mod variant;

pub use event::{AppCommand, ChannelPush, InboundEvent, PushBody, PushPayload};
pub use identity::{PlayerId, RoomId, SessionIdentity, TopicScope};
pub use variant::RelayVariant;
