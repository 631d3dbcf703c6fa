//! High-level error types

use tinymodbus_core::Exception;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Send failed: wrote {sent} of {expected} bytes")]
    Send { sent: usize, expected: usize },

    #[error("Send failed: {0}")]
    SendIo(#[source] tinymodbus_transport::Error),

    #[error("Receive failed: read {received} of {expected} bytes")]
    Receive { received: usize, expected: usize },

    #[error("Receive failed: {0}")]
    ReceiveIo(#[source] tinymodbus_transport::Error),

    #[error("Connect failed: {0}")]
    Connect(#[from] tinymodbus_transport::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    Protocol(#[from] tinymodbus_core::Error),
}

impl Error {
    /// Device-reported exception, if this is one
    pub fn exception(&self) -> Option<Exception> {
        match self {
            Self::Protocol(err) => err.exception(),
            _ => None,
        }
    }

    /// Check if the request was not (fully) sent
    pub fn is_send_failure(&self) -> bool {
        matches!(self, Self::Send { .. } | Self::SendIo(_))
    }

    /// Check if the response was not (fully) received
    pub fn is_receive_failure(&self) -> bool {
        matches!(self, Self::Receive { .. } | Self::ReceiveIo(_))
    }

    /// Check if the transport (not the device) caused the failure
    pub fn is_transport_error(&self) -> bool {
        self.is_send_failure() || self.is_receive_failure() || matches!(self, Self::Connect(_))
    }

    /// Check if the connection is likely unusable for further transactions
    pub fn requires_reconnect(&self) -> bool {
        match self {
            Self::Send { .. }
            | Self::SendIo(_)
            | Self::Receive { .. }
            | Self::ReceiveIo(_)
            | Self::Connect(_) => true,
            Self::Protocol(err) => err.requires_resync(),
            Self::InvalidArgument(_) => false,
        }
    }
}
