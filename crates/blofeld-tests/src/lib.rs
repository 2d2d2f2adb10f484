//! End-to-end tests for the Blofeld SysEx stack
//!
//! Tests drive [`blofeld_sysex::Blofeld`] against a [`MockMidiPort`] scripted
//! to answer sound requests the way a device would:
//!
//! ```bash
//! RUST_LOG=blofeld_sysex=trace cargo test -p blofeld-tests
//! ```
//!
//! # Test Structure
//!
//! - `dump_e2e_test.rs` - fetch, edit, store and re-fetch through the mock
//! - `patch_json_test.rs` - JSON presentation of decoded patches

use std::sync::Once;

use blofeld_sdata::{field_map, Patch, SDATA_LEN};
use blofeld_sysex::frame::{self, Bank, Program};
use blofeld_sysex::MockMidiPort;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG` (once per process)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Answer a request for `bank`/`program` with a dump of `patch`
pub fn script_dump(
    port: &MockMidiPort,
    device_id: u8,
    bank: &str,
    program: u32,
    patch: &Patch,
) -> anyhow::Result<()> {
    let bank = Bank::parse(bank)?;
    let program = Program::new(program)?;
    port.add_response(
        frame::request_frame(device_id, bank, program),
        frame::patch_frame(device_id, bank, program, patch),
    );
    Ok(())
}

/// Answer a request for `bank`/`program` with a verbatim frame
pub fn script_raw_reply(
    port: &MockMidiPort,
    device_id: u8,
    bank: &str,
    program: u32,
    reply: Vec<u8>,
) -> anyhow::Result<()> {
    let request = frame::build_request_frame(device_id, bank, program)?;
    port.add_response(request, reply);
    Ok(())
}

/// SDATA offsets no patch field reads or writes
pub fn unmapped_offsets() -> Vec<usize> {
    let mapped: Vec<usize> = field_map::field_offsets()
        .into_iter()
        .map(|(_, offset)| offset)
        .collect();
    (0..SDATA_LEN).filter(|o| !mapped.contains(o)).collect()
}
