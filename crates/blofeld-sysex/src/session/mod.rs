//! Patch dump exchange
//!
//! A [`DumpSession`] sends one sound request and waits for the matching
//! sound dump, tearing its inbound listener down on every exit path.

mod manager;

pub use manager::DumpSession;

/// Progress of the most recent dump exchange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DumpState {
    /// No exchange started, or the last one was rejected before sending
    #[default]
    Idle,
    /// Request sent, listener registered
    AwaitingResponse,
    /// A dump arrived and decoded
    Completed,
    /// No dump arrived within the response timeout
    TimedOut,
    /// Listener, send, or parse failure
    Failed,
}
