//! Transport layer errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Port closed")]
    PortClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Subscribe failed: {0}")]
    SubscribeFailed(String),
}
