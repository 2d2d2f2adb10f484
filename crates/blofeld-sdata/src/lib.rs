//! blofeld-sdata - Sound patch model and SDATA codec for the Waldorf Blofeld
//!
//! The Blofeld exchanges sounds as a fixed 383-byte block (SDATA). This
//! crate maps that block to a named-field [`Patch`] and back.
//!
//! # Quick Start
//!
//! ```rust
//! use blofeld_sdata::{decode, encode, Patch};
//!
//! let mut patch = Patch::named("Lead");
//! patch.mix_osc1 = 127;
//! patch.filters[0].cutoff = 90;
//!
//! let sdata = encode(&patch);
//! assert_eq!(sdata.len(), 383);
//!
//! let decoded = decode(&sdata).unwrap();
//! assert_eq!(decoded.name, "Lead");
//! assert_eq!(decoded.filters[0].cutoff, 90);
//! ```
//!
//! # Baseline preservation
//!
//! A decoded patch keeps the block it came from. Encoding it again starts
//! from that block, so reserved and unmodeled bytes survive an edit. Call
//! [`Patch::discard_baseline`] to encode from zeros instead.

pub mod codec;
pub mod error;
pub mod field_map;
pub mod patch;
pub mod randomize;

pub use codec::{decode, encode, encode_vec};
pub use error::{CodecError, CodecResult};
pub use field_map::SDATA_LEN;
pub use patch::{Effect, Envelope, Filter, Lfo, ModSlot, Modifier, Oscillator, Patch};
pub use randomize::randomize_oscillators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::codec::{decode, encode};
    pub use crate::error::{CodecError, CodecResult};
    pub use crate::patch::Patch;
}
