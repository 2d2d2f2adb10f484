//! High-level handle for one Blofeld

use std::sync::Arc;

use blofeld_sdata::Patch;
use tracing::{debug, info};

use crate::config::BlofeldConfig;
use crate::error::{DumpError, DumpResult};
use crate::frame::{self, Bank, Program};
use crate::session::{DumpSession, DumpState};
use crate::transport::{InboundSource, MidiOutput, TransportError};

/// A Blofeld reachable through a MIDI output
pub struct Blofeld {
    output: Arc<dyn MidiOutput>,
    config: BlofeldConfig,
    session: DumpSession,
}

impl Blofeld {
    pub fn new(output: Arc<dyn MidiOutput>, config: BlofeldConfig) -> Self {
        let session = DumpSession::new(output.clone(), &config.session);
        info!(device_id = config.device_id, "Blofeld handle created");
        Self {
            output,
            config,
            session,
        }
    }

    pub fn device_id(&self) -> u8 {
        self.config.device_id
    }

    pub fn config(&self) -> &BlofeldConfig {
        &self.config
    }

    /// Outcome of the most recent dump request
    pub fn dump_state(&self) -> DumpState {
        self.session.state()
    }

    /// Transmit a raw SysEx message as-is
    pub async fn send_sysex(&self, message: &[u8]) -> Result<(), TransportError> {
        debug!(len = message.len(), "Sending raw SysEx");
        self.output.send(message).await
    }

    /// Write `patch` into `bank`/`program` on the device addressed by `device_id`
    pub async fn send_patch(
        &self,
        bank: &str,
        program: u32,
        patch: &Patch,
        device_id: u8,
    ) -> DumpResult<()> {
        let bank = Bank::parse(bank)?;
        let program = Program::new(program)?;
        let message = frame::patch_frame(device_id, bank, program, patch);

        self.send_sysex(&message)
            .await
            .map_err(|source| DumpError::PatchSendFailure {
                bank,
                program,
                source,
            })?;

        info!(%bank, %program, name = %patch.name, device_id, "Patch sent");
        Ok(())
    }

    /// Fetch the patch at `bank`/`program` using the configured device id
    pub async fn request_patch_dump(
        &self,
        inbound: &dyn InboundSource,
        bank: &str,
        program: u32,
    ) -> DumpResult<(Patch, u8)> {
        self.session
            .request_dump(inbound, self.config.device_id, bank, program)
            .await
    }
}
