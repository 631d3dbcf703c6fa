//! Response decoding and validation
//!
//! A response is decoded in the same order it is received:
//!
//! 1. [`ResponseHeader::decode`] parses the fixed header (see [`Mode`]).
//! 2. [`ResponseHeader::validate`] checks transaction id, protocol id and unit id.
//! 3. [`verify_frame`] checks the CRC (RTU) or the declared MBAP length (TCP)
//!    over the complete response.
//! 4. [`ResponseHeader::check_function`] surfaces device exceptions and
//!    rejects answers to another function.
//!
//! Fields of the body are read through [`FieldReader`].

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use bytes::Buf;

use crate::{
    checksum,
    constants::{CRC_SIZE, MBAP_HEADER_SIZE, MBAP_LENGTH_OFFSET, MBAP_PREFIX_SIZE, TCP_PROTOCOL_ID},
    error::{Error, Result},
    exception::Exception,
    function::{self, FunctionCode},
    mode::Mode,
};

/// MBAP header fields of a TCP response
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mbap {
    pub transaction_id: u16,
    pub protocol_id: u16,
    pub length: u16,
}

/// Fixed response header, up to and including the function code
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Present in TCP mode only
    pub mbap: Option<Mbap>,
    pub unit_id: u8,
    /// Raw function code; high bit set for exceptions
    pub function: u8,
}

impl ResponseHeader {
    /// Decode a header of exactly [`Mode::header_len`] bytes
    pub fn decode(mode: Mode, header: &[u8]) -> Result<Self> {
        if header.len() != mode.header_len() {
            return Err(Error::UnexpectedLength {
                expected: mode.header_len(),
                actual: header.len(),
            });
        }

        let mut buf = header;

        let mbap = match mode {
            Mode::Tcp => Some(Mbap {
                transaction_id: buf.get_u16(),
                protocol_id: buf.get_u16(),
                length: buf.get_u16(),
            }),
            Mode::Rtu => None,
        };

        Ok(Self {
            mbap,
            unit_id: buf.get_u8(),
            function: buf.get_u8(),
        })
    }

    /// Check that the header answers our request
    ///
    /// Order: transaction id, protocol id, unit id. `transaction_id` is
    /// ignored in RTU mode.
    pub fn validate(&self, unit_id: u8, transaction_id: u16) -> Result<()> {
        if let Some(mbap) = self.mbap {
            if mbap.transaction_id != transaction_id {
                return Err(Error::TransactionIdMismatch {
                    expected: transaction_id,
                    actual: mbap.transaction_id,
                });
            }

            if mbap.protocol_id != TCP_PROTOCOL_ID {
                return Err(Error::ProtocolIdMismatch(mbap.protocol_id));
            }
        }

        if self.unit_id != unit_id {
            return Err(Error::UnitIdMismatch {
                expected: unit_id,
                actual: self.unit_id,
            });
        }

        Ok(())
    }

    /// Check if the device answered with an exception
    pub fn is_exception(&self) -> bool {
        function::is_exception(self.function)
    }

    /// Classify a response that already passed [`verify_frame`]
    ///
    /// `body` starts right after the function code. Exceptions become
    /// [`Error::Exception`]; any other function code must match `expected`.
    pub fn check_function(&self, expected: FunctionCode, body: &[u8]) -> Result<()> {
        if self.is_exception() {
            let code = body.first().copied().ok_or(Error::UnexpectedLength {
                expected: 1,
                actual: 0,
            })?;

            return Err(Error::Exception {
                function: self.function,
                exception: Exception::try_from(code)?,
            });
        }

        if self.function != expected.code() {
            return Err(Error::UnexpectedFunctionCode {
                expected: expected.code(),
                actual: self.function,
            });
        }

        Ok(())
    }
}

/// Integrity check over a complete response frame
///
/// RTU: CRC over everything except the trailing two bytes.
/// TCP: the MBAP length must equal the number of bytes after its 6-byte prefix.
pub fn verify_frame(mode: Mode, frame: &[u8]) -> Result<()> {
    match mode {
        Mode::Rtu => {
            let (body, received) = checksum::split_crc(frame).ok_or(Error::UnexpectedLength {
                expected: CRC_SIZE,
                actual: frame.len(),
            })?;

            let expected = checksum::crc16(body);
            if expected != received {
                return Err(Error::ChecksumMismatch { expected, received });
            }
        }
        Mode::Tcp => {
            if frame.len() < MBAP_HEADER_SIZE {
                return Err(Error::UnexpectedLength {
                    expected: MBAP_HEADER_SIZE,
                    actual: frame.len(),
                });
            }

            let declared =
                BigEndian::read_u16(&frame[MBAP_LENGTH_OFFSET..MBAP_LENGTH_OFFSET + 2]);
            let actual = frame.len() - MBAP_PREFIX_SIZE;
            if usize::from(declared) != actual {
                return Err(Error::LengthMismatch { declared, actual });
            }
        }
    }

    Ok(())
}

/// Bounds-checked reader over response fields
///
/// # Examples
///
/// ```
/// use tinymodbus_core::FieldReader;
///
/// let mut reader = FieldReader::new(&[0x02, 0x00, 0x2A]);
/// assert_eq!(reader.read_u8()?, 2);
/// assert_eq!(reader.read_u16()?, 42);
/// assert!(reader.is_empty());
/// # Ok::<(), tinymodbus_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not read yet
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian 16-bit field
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Read a little-endian 16-bit field (RTU CRC byte order)
    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    /// Read `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos + len;
        if end > self.data.len() {
            return Err(Error::UnexpectedLength {
                expected: end,
                actual: self.data.len(),
            });
        }

        let field = &self.data[self.pos..end];
        self.pos = end;
        Ok(field)
    }
}
