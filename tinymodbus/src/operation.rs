//! Register operations
//!
//! Each operation describes its own request payload and how to interpret
//! the response payload. The transaction engine handles framing and
//! validation, so adding an operation never touches it.

use tinymodbus_core::{
    FieldReader, FunctionCode, RequestWriter,
    constants::{SINGLE_REGISTER_BYTE_COUNT, SINGLE_REGISTER_QUANTITY},
    error::{Error, Result},
};

/// Request builder and response decoder for one function code
pub trait Operation {
    /// Decoded result of a successful response
    type Output;

    /// Function code of the request
    fn function(&self) -> FunctionCode;

    /// Size of a normal response payload after the function code
    fn response_len(&self) -> usize;

    /// Append the request payload after the function code
    fn encode(&self, frame: &mut RequestWriter<'_>) -> Result<()>;

    /// Interpret a validated response payload
    fn decode(&self, body: &mut FieldReader<'_>) -> Result<Self::Output>;
}

/// Read one holding register (0x03)
///
/// Request: address, quantity = 1. Response: byte count = 2, value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReadHoldingRegister {
    /// Zero-based register address
    pub address: u16,
}

impl ReadHoldingRegister {
    pub fn new(address: u16) -> Self {
        Self { address }
    }
}

impl Operation for ReadHoldingRegister {
    type Output = u16;

    fn function(&self) -> FunctionCode {
        FunctionCode::ReadHoldingRegisters
    }

    fn response_len(&self) -> usize {
        1 + usize::from(SINGLE_REGISTER_BYTE_COUNT)
    }

    fn encode(&self, frame: &mut RequestWriter<'_>) -> Result<()> {
        frame.put_u16(self.address)?;
        frame.put_u16(SINGLE_REGISTER_QUANTITY)
    }

    fn decode(&self, body: &mut FieldReader<'_>) -> Result<u16> {
        let byte_count = body.read_u8()?;
        if byte_count != SINGLE_REGISTER_BYTE_COUNT {
            return Err(Error::UnexpectedLength {
                expected: usize::from(SINGLE_REGISTER_BYTE_COUNT),
                actual: usize::from(byte_count),
            });
        }

        body.read_u16()
    }
}

/// Write one holding register (0x06)
///
/// Request: address, value. Response: the same address and value echoed back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WriteSingleRegister {
    /// Zero-based register address
    pub address: u16,
    pub value: u16,
}

impl WriteSingleRegister {
    pub fn new(address: u16, value: u16) -> Self {
        Self { address, value }
    }
}

impl Operation for WriteSingleRegister {
    type Output = ();

    fn function(&self) -> FunctionCode {
        FunctionCode::WriteSingleRegister
    }

    fn response_len(&self) -> usize {
        4
    }

    fn encode(&self, frame: &mut RequestWriter<'_>) -> Result<()> {
        frame.put_u16(self.address)?;
        frame.put_u16(self.value)
    }

    fn decode(&self, body: &mut FieldReader<'_>) -> Result<()> {
        let address = body.read_u16()?;
        let value = body.read_u16()?;

        if address != self.address || value != self.value {
            return Err(Error::InvalidResponse(format!(
                "write echo mismatch: sent register {} = {}, device echoed register {} = {}",
                self.address, self.value, address, value
            )));
        }

        Ok(())
    }
}
