//! Error types for tinymodbus-core

use crate::exception::Exception;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Request does not fit the frame buffer
    #[error("Frame too large: {size} bytes (max: {max} bytes)")]
    FrameTooLarge {
        size: usize,
        max: usize,
    },

    /// RTU CRC verification failed
    #[error("CRC mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// MBAP length field disagrees with the bytes received
    #[error("MBAP length mismatch: header declares {declared} bytes, received {actual} bytes")]
    LengthMismatch {
        declared: u16,
        actual: usize,
    },

    /// Response carries a different transaction id than the request
    #[error("Invalid transaction id: expected {expected}, got {actual}")]
    TransactionIdMismatch {
        expected: u16,
        actual: u16,
    },

    /// MBAP protocol id is not the Modbus protocol
    #[error("Invalid protocol id: {0}")]
    ProtocolIdMismatch(u16),

    /// Response comes from another unit
    #[error("Invalid unit id: expected {expected}, got {actual}")]
    UnitIdMismatch {
        expected: u8,
        actual: u8,
    },

    /// Response function code differs from the request
    #[error("Unexpected function code: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedFunctionCode {
        expected: u8,
        actual: u8,
    },

    /// Exception response with a code outside the standard set
    #[error("Unexpected exception code: 0x{0:02X}")]
    UnexpectedExceptionCode(u8),

    /// A length field or the response body has the wrong size
    #[error("Unexpected response length: expected {expected}, got {actual}")]
    UnexpectedLength {
        expected: usize,
        actual: usize,
    },

    /// Response is well framed but its content does not answer the request
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Device returned an exception response
    #[error("Device exception for function 0x{function:02X}: {exception}")]
    Exception {
        function: u8,
        exception: Exception,
    },
}

impl Error {
    /// Device-reported exception, if this is one
    pub fn exception(&self) -> Option<Exception> {
        match self {
            Self::Exception { exception, .. } => Some(*exception),
            _ => None,
        }
    }

    /// Check if the response failed its CRC or length integrity check
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. } | Self::LengthMismatch { .. }
        )
    }

    /// Check if the response may belong to another request or device
    ///
    /// After such an error the stream may hold stale bytes; callers usually reconnect.
    pub fn requires_resync(&self) -> bool {
        matches!(
            self,
            Self::TransactionIdMismatch { .. }
                | Self::ProtocolIdMismatch(_)
                | Self::UnitIdMismatch { .. }
                | Self::ChecksumMismatch { .. }
                | Self::LengthMismatch { .. }
        )
    }
}
