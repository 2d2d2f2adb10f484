//! Mock MIDI port for testing

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{InboundSource, ListenerId, MessageFilter, MessageHandler, MidiOutput, TransportError};
use crate::config::MockConfig;

struct Listener {
    id: ListenerId,
    filter: MessageFilter,
    handler: MessageHandler,
}

#[derive(Default)]
struct ListenerTable {
    next_id: AtomicU64,
    entries: RwLock<Vec<Listener>>,
}

impl ListenerTable {
    fn dispatch(&self, message: &[u8]) {
        let entries = self.entries.read();
        for listener in entries.iter().filter(|l| (l.filter)(message)) {
            (listener.handler)(message);
        }
    }
}

/// Loopback MIDI port: records what is sent and replays scripted replies
pub struct MockMidiPort {
    config: MockConfig,
    open: AtomicBool,
    fail_sends: AtomicBool,
    sent: RwLock<Vec<Vec<u8>>>,
    /// Scripted replies (request -> response), matched exactly
    responses: RwLock<Vec<(Vec<u8>, Vec<u8>)>>,
    listeners: Arc<ListenerTable>,
}

impl MockMidiPort {
    pub fn new(config: &MockConfig) -> Self {
        Self {
            config: config.clone(),
            open: AtomicBool::new(true),
            fail_sends: AtomicBool::new(false),
            sent: RwLock::new(Vec::new()),
            responses: RwLock::new(Vec::new()),
            listeners: Arc::new(ListenerTable::default()),
        }
    }

    /// Reply with `response` whenever exactly `request` is sent
    pub fn add_response(&self, request: Vec<u8>, response: Vec<u8>) {
        self.responses.write().push((request, response));
    }

    /// Deliver a message to listeners as if the device had sent it
    pub fn inject_incoming(&self, message: &[u8]) {
        tracing::debug!(len = message.len(), "Mock port: injecting inbound message");
        self.listeners.dispatch(message);
    }

    /// Every message passed to [`MidiOutput::send`] so far, oldest first
    pub fn sent_messages(&self) -> Vec<Vec<u8>> {
        self.sent.read().clone()
    }

    pub fn clear_sent(&self) {
        self.sent.write().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.entries.read().len()
    }

    /// Make subsequent sends fail with [`TransportError::SendFailed`]
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Closed ports reject both sends and new listeners
    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    fn find_response(&self, request: &[u8]) -> Option<Vec<u8>> {
        self.responses
            .read()
            .iter()
            .find(|(req, _)| req == request)
            .map(|(_, resp)| resp.clone())
    }
}

impl Default for MockMidiPort {
    fn default() -> Self {
        Self::new(&MockConfig::default())
    }
}

#[async_trait]
impl MidiOutput for MockMidiPort {
    async fn send(&self, message: &[u8]) -> Result<(), TransportError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::PortClosed);
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed("mock send failure".to_string()));
        }

        self.sent.write().push(message.to_vec());
        tracing::debug!(message = %hex::encode(message), "Mock port: sent message");

        let Some(response) = self.find_response(message) else {
            return Ok(());
        };

        if self.config.latency_ms > 0 {
            let listeners = Arc::clone(&self.listeners);
            let latency = Duration::from_millis(self.config.latency_ms);
            tokio::spawn(async move {
                tokio::time::sleep(latency).await;
                listeners.dispatch(&response);
            });
        } else {
            self.listeners.dispatch(&response);
        }

        Ok(())
    }
}

impl InboundSource for MockMidiPort {
    fn subscribe(
        &self,
        filter: MessageFilter,
        handler: MessageHandler,
    ) -> Result<ListenerId, TransportError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::PortClosed);
        }

        let id = ListenerId(self.listeners.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners.entries.write().push(Listener {
            id,
            filter,
            handler,
        });
        Ok(id)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.entries.write().retain(|l| l.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ListenerGuard;
    use parking_lot::Mutex;

    fn collector() -> (Arc<Mutex<Vec<Vec<u8>>>>, MessageHandler) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: MessageHandler = Box::new(move |msg: &[u8]| sink.lock().push(msg.to_vec()));
        (seen, handler)
    }

    #[tokio::test]
    async fn test_send_records_messages() {
        let port = MockMidiPort::default();
        port.send(&[0xF0, 0x01, 0xF7]).await.unwrap();
        port.send(&[0xF0, 0x02, 0xF7]).await.unwrap();

        assert_eq!(
            port.sent_messages(),
            vec![vec![0xF0, 0x01, 0xF7], vec![0xF0, 0x02, 0xF7]]
        );

        port.clear_sent();
        assert!(port.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_forced_send_failure() {
        let port = MockMidiPort::default();
        port.set_fail_sends(true);

        let err = port.send(&[0xF0, 0xF7]).await.unwrap_err();
        assert!(matches!(err, TransportError::SendFailed(_)));
        assert!(port.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_closed_port_rejects() {
        let port = MockMidiPort::default();
        port.set_open(false);

        assert_eq!(port.send(&[0xF0]).await, Err(TransportError::PortClosed));
        let (_, handler) = collector();
        assert_eq!(
            port.subscribe(Box::new(|_: &[u8]| true), handler),
            Err(TransportError::PortClosed)
        );
    }

    #[test]
    fn test_filter_selects_messages() {
        let port = MockMidiPort::default();
        let (seen, handler) = collector();
        port.subscribe(Box::new(|msg: &[u8]| msg.first() == Some(&0xF0)), handler)
            .unwrap();

        port.inject_incoming(&[0x90, 0x40, 0x7F]);
        port.inject_incoming(&[0xF0, 0x3E, 0xF7]);

        assert_eq!(*seen.lock(), vec![vec![0xF0, 0x3E, 0xF7]]);
    }

    #[test]
    fn test_guard_unsubscribes_on_drop() {
        let port = MockMidiPort::default();
        let (seen, handler) = collector();
        {
            let _guard = ListenerGuard::subscribe(&port, Box::new(|_: &[u8]| true), handler).unwrap();
            assert_eq!(port.listener_count(), 1);
            port.inject_incoming(&[0xF0]);
        }
        assert_eq!(port.listener_count(), 0);

        port.inject_incoming(&[0xF0]);
        assert_eq!(seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_response_delivered() {
        let port = MockMidiPort::default();
        port.add_response(vec![0xF0, 0x00, 0xF7], vec![0xF0, 0x10, 0xF7]);
        let (seen, handler) = collector();
        port.subscribe(Box::new(|_: &[u8]| true), handler).unwrap();

        port.send(&[0xF0, 0x01, 0xF7]).await.unwrap();
        assert!(seen.lock().is_empty());

        port.send(&[0xF0, 0x00, 0xF7]).await.unwrap();
        assert_eq!(*seen.lock(), vec![vec![0xF0, 0x10, 0xF7]]);
    }

    #[tokio::test]
    async fn test_scripted_response_with_latency() {
        let port = MockMidiPort::new(&MockConfig { latency_ms: 20 });
        port.add_response(vec![0x01], vec![0x02]);
        let (seen, handler) = collector();
        port.subscribe(Box::new(|_: &[u8]| true), handler).unwrap();

        port.send(&[0x01]).await.unwrap();
        assert!(seen.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*seen.lock(), vec![vec![0x02]]);
    }

    #[test]
    fn test_listener_ids_are_unique() {
        let port = MockMidiPort::default();
        let a = port.subscribe(Box::new(|_: &[u8]| true), Box::new(|_: &[u8]| {})).unwrap();
        let b = port.subscribe(Box::new(|_: &[u8]| true), Box::new(|_: &[u8]| {})).unwrap();
        assert_ne!(a, b);

        port.unsubscribe(a);
        assert_eq!(port.listener_count(), 1);
        port.unsubscribe(a);
        assert_eq!(port.listener_count(), 1);
    }
}
