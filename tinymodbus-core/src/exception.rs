//! Modbus exception codes

use crate::error::Error;

/// Exception code returned by a device in place of a normal payload
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[repr(u8)]
pub enum Exception {
    #[error("illegal function")]
    IllegalFunction = 0x01,

    #[error("illegal data address")]
    IllegalDataAddress = 0x02,

    #[error("illegal data value")]
    IllegalDataValue = 0x03,

    #[error("server device failure")]
    ServerDeviceFailure = 0x04,

    #[error("acknowledge")]
    Acknowledge = 0x05,

    #[error("server device busy")]
    ServerDeviceBusy = 0x06,

    #[error("negative acknowledge")]
    NegativeAcknowledge = 0x07,

    #[error("memory parity error")]
    MemoryParityError = 0x08,

    #[error("gateway path unavailable")]
    GatewayPathUnavailable = 0x0A,

    #[error("gateway target device failed to respond")]
    GatewayTargetDeviceFailedToRespond = 0x0B,
}

impl Exception {
    /// Wire value of this exception
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Check if the device accepted the request but has not finished it yet
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Acknowledge | Self::ServerDeviceBusy)
    }
}

impl From<Exception> for u8 {
    fn from(exception: Exception) -> u8 {
        exception.code()
    }
}

impl TryFrom<u8> for Exception {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0x01 => Ok(Self::IllegalFunction),
            0x02 => Ok(Self::IllegalDataAddress),
            0x03 => Ok(Self::IllegalDataValue),
            0x04 => Ok(Self::ServerDeviceFailure),
            0x05 => Ok(Self::Acknowledge),
            0x06 => Ok(Self::ServerDeviceBusy),
            0x07 => Ok(Self::NegativeAcknowledge),
            0x08 => Ok(Self::MemoryParityError),
            0x0A => Ok(Self::GatewayPathUnavailable),
            0x0B => Ok(Self::GatewayTargetDeviceFailedToRespond),
            other => Err(Error::UnexpectedExceptionCode(other)),
        }
    }
}
