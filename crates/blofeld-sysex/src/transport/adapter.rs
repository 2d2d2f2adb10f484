//! MIDI transport traits and listener types

use std::fmt;

use async_trait::async_trait;

use super::TransportError;

/// Predicate deciding whether an inbound message reaches a listener
pub type MessageFilter = Box<dyn Fn(&[u8]) -> bool + Send + Sync>;

/// Callback invoked with every inbound message that passes the filter
///
/// Handlers run on the delivering thread and must not block.
pub type MessageHandler = Box<dyn Fn(&[u8]) + Send + Sync>;

/// Handle returned by [`InboundSource::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Outbound half of a MIDI port
#[async_trait]
pub trait MidiOutput: Send + Sync {
    /// Transmit one complete SysEx message
    async fn send(&self, message: &[u8]) -> Result<(), TransportError>;
}

/// Inbound half of a MIDI port
///
/// Delivery is callback driven: every inbound message is offered to every
/// registered filter, and matching handlers are invoked in registration order.
pub trait InboundSource: Send + Sync {
    fn subscribe(
        &self,
        filter: MessageFilter,
        handler: MessageHandler,
    ) -> Result<ListenerId, TransportError>;

    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}

/// Unsubscribes its listener when dropped
pub struct ListenerGuard<'a> {
    source: &'a dyn InboundSource,
    id: ListenerId,
}

impl<'a> ListenerGuard<'a> {
    pub fn subscribe(
        source: &'a dyn InboundSource,
        filter: MessageFilter,
        handler: MessageHandler,
    ) -> Result<Self, TransportError> {
        let id = source.subscribe(filter, handler)?;
        Ok(Self { source, id })
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerGuard<'_> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
        tracing::trace!(listener = %self.id, "Listener removed");
    }
}
