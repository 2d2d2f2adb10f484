//! Transport layer for SysEx exchange
//!
//! Device I/O is split into two traits so a session can listen on one port
//! and transmit on another:
//! - [`MidiOutput`] sends complete SysEx messages
//! - [`InboundSource`] delivers inbound messages to filtered listeners
//!
//! [`mock::MockMidiPort`] implements both for tests and offline use.

mod adapter;
pub mod error;
pub mod mock;

pub use adapter::{
    InboundSource, ListenerGuard, ListenerId, MessageFilter, MessageHandler, MidiOutput,
};
pub use error::TransportError;
pub use mock::MockMidiPort;
