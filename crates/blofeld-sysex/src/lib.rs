//! blofeld-sysex - SysEx sound dump protocol for the Waldorf Blofeld
//!
//! This crate frames SDATA blocks into SysEx sound dumps and runs the
//! request/response exchange that fetches a patch from the device.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Blofeld                           │
//! │  send_patch / request_patch_dump / send_sysex            │
//! │                                                          │
//! │  ┌──────────────┐        ┌────────────────────────────┐  │
//! │  │ DumpSession  │───────▶│ frame (SNDR/SNDD codec)    │  │
//! │  │ (state)      │        │  └─ blofeld_sdata::codec   │  │
//! │  └──────┬───────┘        └────────────────────────────┘  │
//! │         │                                                │
//! │  ┌──────┴───────┐        ┌────────────────────────────┐  │
//! │  │ MidiOutput   │        │ InboundSource              │  │
//! │  │ (send)       │        │ (filtered listeners)       │  │
//! │  └──────────────┘        └────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Port discovery and the MIDI driver itself live outside this crate;
//! anything implementing the two transport traits can be used.

pub mod client;
pub mod config;
pub mod error;
pub mod frame;
pub mod session;
pub mod transport;

pub use client::Blofeld;
pub use config::{BlofeldConfig, MockConfig, SessionConfig};
pub use error::{ConfigError, DumpError, DumpResult, FrameError};
pub use frame::{
    build_patch_frame, build_request_frame, checksum, parse_response_frame,
    parse_response_frame_full, Bank, Program, ResponseFrame,
};
pub use session::{DumpSession, DumpState};
pub use transport::{InboundSource, ListenerGuard, ListenerId, MidiOutput, MockMidiPort, TransportError};

// Re-export for convenience
pub use blofeld_sdata::{decode, encode, CodecError, Patch, SDATA_LEN};
