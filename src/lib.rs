//! # room-relay
//!
//! Bidirectional relay between a Phoenix-style room channel and a front-end
//! application's message ports.
//!
//! Server events on the joined topic are forwarded to the application's
//! inbound port; messages the application emits on its generic and move
//! ports are pushed back onto the channel with the room and player
//! identifiers attached. The relay owns no game logic: bodies and moves pass
//! through untouched.
//!
//! ## Architecture
//!
//! ```text
//! Server (Phoenix socket)
//!     │
//!     ├── Socket transport task (channel/)
//!     │       join · push · heartbeat
//!     │
//!     ├── ChannelHandle (channel/)
//!     │
//!     ├── RelaySession + routing (relay/)
//!     │
//!     ├── RelayPorts / AppHandle (app/)
//!     │
//!     └── Application (stdio bridge in the binary)
//! ```

pub mod app;
pub mod channel;
pub mod config;
pub mod domain;
pub mod error;
pub mod relay;
