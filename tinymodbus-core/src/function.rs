//! Modbus function codes

use std::fmt;

use crate::constants::EXCEPTION_BIT;

/// Function codes this client issues
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FunctionCode {
    ReadHoldingRegisters = 0x03,
    WriteSingleRegister = 0x06,
}

impl FunctionCode {
    /// Wire value of this function code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Function code a device uses to report an exception for this request
    pub fn exception_code(self) -> u8 {
        self.code() | EXCEPTION_BIT
    }
}

/// Check if a response function code marks an exception
pub fn is_exception(raw: u8) -> bool {
    raw & EXCEPTION_BIT != 0
}

impl From<FunctionCode> for u8 {
    fn from(function: FunctionCode) -> u8 {
        function.code()
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadHoldingRegisters => "ReadHoldingRegisters",
            Self::WriteSingleRegister => "WriteSingleRegister",
        };
        write!(f, "{}(0x{:02X})", name, self.code())
    }
}
