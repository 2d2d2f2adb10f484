//! SysEx layer errors

use std::time::Duration;

use blofeld_sdata::CodecError;
use thiserror::Error;

use crate::frame::{Bank, Program};
use crate::transport::TransportError;

/// Errors raised while building or validating a dump frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("bank must be A-H, got {0:?}")]
    InvalidBank(String),

    #[error("program must be in range 1-128, got {0}")]
    InvalidProgram(u32),

    #[error("message is not a SysEx frame")]
    NotSysExFrame,

    #[error("not a Waldorf Blofeld SysEx (manufacturer 0x{manufacturer:02X}, family 0x{family:02X})")]
    WrongManufacturer { manufacturer: u8, family: u8 },

    #[error("unexpected message type 0x{0:02X} (expected SNDD 0x10)")]
    WrongMessageType(u8),

    #[error("checksum mismatch: expected 0x{expected:02X} got 0x{received:02X}")]
    ChecksumMismatch { expected: u8, received: u8 },

    #[error("unexpected dump size {actual} (want {expected})")]
    LengthMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors raised by a dump exchange or a patch transmission
#[derive(Debug, Error)]
pub enum DumpError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("failed to listen for patch dump")]
    ListenFailed(#[source] TransportError),

    #[error("failed to request patch dump")]
    RequestSendFailure(#[source] TransportError),

    #[error("failed to send patch to bank {bank} program {program}")]
    PatchSendFailure {
        bank: Bank,
        program: Program,
        #[source]
        source: TransportError,
    },

    #[error("timed out after {0:?} waiting for patch dump")]
    DumpTimeout(Duration),

    #[error("inbound message source closed before a dump arrived")]
    InboundClosed,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config")]
    Parse(#[from] toml::de::Error),
}

pub type DumpResult<T> = Result<T, DumpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_mismatch_reports_both_values() {
        let err = FrameError::ChecksumMismatch {
            expected: 0x48,
            received: 0x10,
        };
        assert_eq!(err.to_string(), "checksum mismatch: expected 0x48 got 0x10");
    }

    #[test]
    fn test_codec_error_passes_through() {
        let err: FrameError = CodecError::InvalidLength {
            expected: 383,
            actual: 5,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid SDATA length: expected 383 bytes, got 5"
        );

        let dump: DumpError = err.into();
        assert!(matches!(dump, DumpError::Frame(FrameError::Codec(_))));
    }

    #[test]
    fn test_transport_cause_reported_once() {
        use std::error::Error as _;

        let err = DumpError::PatchSendFailure {
            bank: Bank::parse("C").unwrap(),
            program: Program::new(12).unwrap(),
            source: TransportError::SendFailed("port busy".to_string()),
        };
        assert_eq!(err.to_string(), "failed to send patch to bank C program 12");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("Send failed: port busy".to_string())
        );

        let err = DumpError::RequestSendFailure(TransportError::PortClosed);
        assert_eq!(err.to_string(), "failed to request patch dump");
        assert_eq!(err.source().map(|s| s.to_string()), Some("Port closed".to_string()));

        let err = DumpError::ListenFailed(TransportError::PortClosed);
        assert!(!err.to_string().contains("Port closed"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_timeout_message() {
        let err = DumpError::DumpTimeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "timed out after 5s waiting for patch dump");
    }
}
