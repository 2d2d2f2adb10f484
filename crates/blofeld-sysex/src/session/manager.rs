//! Dump session for SNDR / SNDD exchanges

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::DumpState;
use crate::config::SessionConfig;
use crate::error::{DumpError, DumpResult};
use crate::frame::{self, sysex, Bank, Program};
use crate::transport::{InboundSource, ListenerGuard, MessageFilter, MessageHandler, MidiOutput};
use blofeld_sdata::Patch;

/// Requests patches from a device and waits for the dump
///
/// A session runs one exchange at a time; [`DumpSession::state`] reports the
/// outcome of the most recent one.
pub struct DumpSession {
    output: Arc<dyn MidiOutput>,
    response_timeout: Duration,
    state: RwLock<DumpState>,
}

impl DumpSession {
    pub fn new(output: Arc<dyn MidiOutput>, config: &SessionConfig) -> Self {
        Self::with_timeout(output, config.response_timeout())
    }

    pub fn with_timeout(output: Arc<dyn MidiOutput>, response_timeout: Duration) -> Self {
        Self {
            output,
            response_timeout,
            state: RwLock::new(DumpState::Idle),
        }
    }

    pub fn state(&self) -> DumpState {
        *self.state.read()
    }

    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    fn set_state(&self, state: DumpState) {
        *self.state.write() = state;
    }

    /// Request the patch at `bank`/`program` and wait for the device's dump
    ///
    /// The listener on `inbound` is registered before the request goes out,
    /// so a fast reply is never missed. The first SysEx message to arrive is
    /// taken as the reply; later ones are dropped. Returns the decoded patch
    /// and the device id the reply carried.
    pub async fn request_dump(
        &self,
        inbound: &dyn InboundSource,
        device_id: u8,
        bank: &str,
        program: u32,
    ) -> DumpResult<(Patch, u8)> {
        let bank = Bank::parse(bank)?;
        let program = Program::new(program)?;

        let (tx, mut rx) = mpsc::channel::<Vec<u8>>(1);
        let filter: MessageFilter = Box::new(|msg: &[u8]| msg.first() == Some(&sysex::START));
        let handler: MessageHandler = Box::new(move |msg: &[u8]| {
            if tx.try_send(msg.to_vec()).is_err() {
                trace!(len = msg.len(), "Reply slot full, dropping SysEx message");
            }
        });

        let guard = match ListenerGuard::subscribe(inbound, filter, handler) {
            Ok(guard) => guard,
            Err(e) => {
                self.set_state(DumpState::Failed);
                return Err(DumpError::ListenFailed(e));
            }
        };
        self.set_state(DumpState::AwaitingResponse);

        let request = frame::request_frame(device_id, bank, program);
        debug!(%bank, %program, device_id, request = %hex::encode(&request), "Requesting patch dump");

        if let Err(e) = self.output.send(&request).await {
            drop(guard);
            self.set_state(DumpState::Failed);
            warn!(%bank, %program, error = %e, "Failed to send dump request");
            return Err(DumpError::RequestSendFailure(e));
        }

        let received = tokio::time::timeout(self.response_timeout, rx.recv()).await;
        drop(guard);

        match received {
            Ok(Some(message)) => match frame::parse_response_frame(&message) {
                Ok((patch, responder)) => {
                    self.set_state(DumpState::Completed);
                    info!(%bank, %program, name = %patch.name, device_id = responder, "Patch dump received");
                    Ok((patch, responder))
                }
                Err(e) => {
                    self.set_state(DumpState::Failed);
                    warn!(%bank, %program, error = %e, "Rejected patch dump");
                    Err(e.into())
                }
            },
            Ok(None) => {
                self.set_state(DumpState::Failed);
                warn!(%bank, %program, "Inbound source dropped the listener");
                Err(DumpError::InboundClosed)
            }
            Err(_) => {
                self.set_state(DumpState::TimedOut);
                warn!(%bank, %program, timeout = ?self.response_timeout, "Patch dump timed out");
                Err(DumpError::DumpTimeout(self.response_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfig;
    use crate::error::FrameError;
    use crate::transport::MockMidiPort;
    use pretty_assertions::assert_eq;

    fn slot(bank: &str, program: u32) -> (Bank, Program) {
        (Bank::parse(bank).unwrap(), Program::new(program).unwrap())
    }

    fn scripted_port(latency_ms: u64, bank: &str, program: u32, patch: &Patch) -> Arc<MockMidiPort> {
        let port = Arc::new(MockMidiPort::new(&MockConfig { latency_ms }));
        let (b, p) = slot(bank, program);
        port.add_response(
            frame::request_frame(0x00, b, p),
            frame::patch_frame(0x00, b, p, patch),
        );
        port
    }

    #[tokio::test]
    async fn test_dump_completes() {
        let mut patch = Patch::named("Pad");
        patch.filters[0].cutoff = 100;
        let port = scripted_port(0, "A", 1, &patch);
        let session = DumpSession::new(port.clone(), &SessionConfig::default());

        let (received, device_id) = session.request_dump(&*port, 0, "A", 1).await.unwrap();

        assert_eq!(received.name, "Pad");
        assert_eq!(received.filters[0].cutoff, 100);
        assert_eq!(device_id, 0);
        assert_eq!(session.state(), DumpState::Completed);
        assert_eq!(port.listener_count(), 0);
        assert_eq!(
            port.sent_messages(),
            vec![vec![0xF0, 0x3E, 0x13, 0x00, 0x00, 0x00, 0x00, 0xF7]]
        );
    }

    #[tokio::test]
    async fn test_dump_with_latency() {
        let port = scripted_port(20, "H", 128, &Patch::named("Late"));
        let session = DumpSession::with_timeout(port.clone(), Duration::from_secs(2));

        let (received, _) = session.request_dump(&*port, 0, "h", 128).await.unwrap();
        assert_eq!(received.name, "Late");
        assert_eq!(port.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_tears_down_listener() {
        let port = Arc::new(MockMidiPort::default());
        let session = DumpSession::with_timeout(port.clone(), Duration::from_millis(50));

        let err = session.request_dump(&*port, 0, "B", 5).await.unwrap_err();

        assert!(matches!(err, DumpError::DumpTimeout(d) if d == Duration::from_millis(50)));
        assert_eq!(session.state(), DumpState::TimedOut);
        assert_eq!(port.listener_count(), 0);
        assert_eq!(port.sent_messages().len(), 1);

        // A late dump reaches nobody
        let (b, p) = slot("B", 5);
        port.inject_incoming(&frame::patch_frame(0x00, b, p, &Patch::named("Late")));
        assert_eq!(session.state(), DumpState::TimedOut);
    }

    #[tokio::test]
    async fn test_invalid_slot_sends_nothing() {
        let port = Arc::new(MockMidiPort::default());
        let session = DumpSession::new(port.clone(), &SessionConfig::default());

        let err = session.request_dump(&*port, 0, "X", 1).await.unwrap_err();
        assert!(matches!(err, DumpError::Frame(FrameError::InvalidBank(_))));

        let err = session.request_dump(&*port, 0, "A", 0).await.unwrap_err();
        assert!(matches!(err, DumpError::Frame(FrameError::InvalidProgram(0))));

        assert_eq!(session.state(), DumpState::Idle);
        assert!(port.sent_messages().is_empty());
        assert_eq!(port.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_send_failure() {
        let port = Arc::new(MockMidiPort::default());
        port.set_fail_sends(true);
        let session = DumpSession::new(port.clone(), &SessionConfig::default());

        let err = session.request_dump(&*port, 0, "A", 1).await.unwrap_err();

        assert!(matches!(err, DumpError::RequestSendFailure(_)));
        assert_eq!(session.state(), DumpState::Failed);
        assert_eq!(port.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_listen_failure() {
        let port = Arc::new(MockMidiPort::default());
        port.set_open(false);
        let session = DumpSession::new(port.clone(), &SessionConfig::default());

        let err = session.request_dump(&*port, 0, "A", 1).await.unwrap_err();

        assert!(matches!(err, DumpError::ListenFailed(_)));
        assert_eq!(session.state(), DumpState::Failed);
        assert!(port.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_dump_is_reported() {
        let port = Arc::new(MockMidiPort::default());
        let (b, p) = slot("A", 1);
        let mut reply = frame::patch_frame(0x00, b, p, &Patch::named("Bad"));
        let checksum_at = reply.len() - 2;
        reply[checksum_at] = (reply[checksum_at] + 1) & 0x7F;
        if reply[checksum_at] == frame::CHECKSUM_WILDCARD {
            reply[checksum_at] = 0;
        }
        port.add_response(frame::request_frame(0x00, b, p), reply);
        let session = DumpSession::new(port.clone(), &SessionConfig::default());

        let err = session.request_dump(&*port, 0, "A", 1).await.unwrap_err();

        assert!(matches!(
            err,
            DumpError::Frame(FrameError::ChecksumMismatch { .. })
        ));
        assert_eq!(session.state(), DumpState::Failed);
        assert_eq!(port.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_non_sysex_traffic_ignored() {
        let port = Arc::new(MockMidiPort::default());
        let (b, p) = slot("C", 3);
        let reply = frame::patch_frame(0x00, b, p, &Patch::named("Keys"));
        let session = DumpSession::with_timeout(port.clone(), Duration::from_secs(2));

        let injector = {
            let port = port.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                port.inject_incoming(&[0x90, 0x3C, 0x64]);
                port.inject_incoming(&[0xF8]);
                port.inject_incoming(&reply);
            })
        };

        let (received, _) = session.request_dump(&*port, 0, "C", 3).await.unwrap();
        injector.await.unwrap();
        assert_eq!(received.name, "Keys");
    }

    #[tokio::test]
    async fn test_first_sysex_wins() {
        let port = Arc::new(MockMidiPort::default());
        let (b, p) = slot("A", 1);
        let first = frame::patch_frame(0x00, b, p, &Patch::named("First"));
        let second = frame::patch_frame(0x00, b, p, &Patch::named("Second"));
        let session = DumpSession::with_timeout(port.clone(), Duration::from_secs(2));

        let injector = {
            let port = port.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                port.inject_incoming(&first);
                port.inject_incoming(&second);
            })
        };

        let (received, _) = session.request_dump(&*port, 0, "A", 1).await.unwrap();
        injector.await.unwrap();
        assert_eq!(received.name, "First");
    }

    #[tokio::test]
    async fn test_responder_device_id_returned() {
        let port = Arc::new(MockMidiPort::default());
        let (b, p) = slot("D", 10);
        port.add_response(
            frame::request_frame(0x7F, b, p),
            frame::patch_frame(0x05, b, p, &Patch::named("Any")),
        );
        let session = DumpSession::new(port.clone(), &SessionConfig::default());

        let (_, device_id) = session.request_dump(&*port, 0x7F, "D", 10).await.unwrap();
        assert_eq!(device_id, 0x05);
    }
}
