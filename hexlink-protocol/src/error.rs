//! Protocol error types.

use thiserror::Error;

/// Errors raised by the hexlink codec.
///
/// Every variant aborts the encode or decode pass at the point of
/// detection; there is no partial recovery or resynchronization within a
/// single message. The transport layer decides whether to drop, log, or
/// request retransmission.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {reason}")]
    MalformedEnvelope { reason: &'static str },

    #[error("invalid message body: {reason}")]
    BodyFormat { reason: &'static str },

    #[error("checksum mismatch: stored {expected:#04x}, computed {actual:#04x}")]
    IntegrityMismatch { expected: u8, actual: u8 },

    #[error("message overflow: body capacity {capacity} exceeded")]
    Overflow { capacity: usize },

    #[error("buffer exhausted: read needs {needed} bytes, {remaining} remaining")]
    BufferExhausted { needed: usize, remaining: usize },

    #[error("invalid field value: {value:#04x}")]
    InvalidFieldValue { value: u8 },
}

impl ProtocolError {
    /// Returns whether requesting retransmission could succeed.
    ///
    /// Envelope, body-format and integrity failures are channel corruption;
    /// the remaining variants indicate a local usage or schema mismatch
    /// that a resend would reproduce.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProtocolError::MalformedEnvelope { .. }
                | ProtocolError::BodyFormat { .. }
                | ProtocolError::IntegrityMismatch { .. }
        )
    }
}
