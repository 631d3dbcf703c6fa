//! Request frame encoding
//!
//! # Frame Structure
//!
//! ```text
//! TCP  ┌──────────────┬─────────────┬─────────────┬─────────┬──────────┬─────────────┐
//!      │ Transaction  │ Protocol ID │   Length    │ Unit ID │ Function │   Payload   │
//!      │ (BE u16)     │ (BE u16, 0) │ (BE u16)    │  1 byte │  1 byte  │ (BE fields) │
//!      └──────────────┴─────────────┴─────────────┴─────────┴──────────┴─────────────┘
//!
//! RTU  ┌─────────┬──────────┬─────────────┬──────────────────┐
//!      │ Unit ID │ Function │   Payload   │      CRC-16      │
//!      │  1 byte │  1 byte  │ (BE fields) │ (low byte first) │
//!      └─────────┴──────────┴─────────────┴──────────────────┘
//! ```
//!
//! The MBAP length counts every byte from the unit id to the end of the frame.

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::{
    BUFFER_CAPACITY,
    checksum,
    constants::{MBAP_LENGTH_OFFSET, MBAP_PREFIX_SIZE, TCP_PROTOCOL_ID},
    error::{Error, Result},
    function::FunctionCode,
    mode::Mode,
};

/// Writes one request into a bounded frame buffer
///
/// The buffer is cleared on [`start`](Self::start), so a failed or stale
/// transaction never leaks bytes into the next frame. Every write is checked
/// against [`BUFFER_CAPACITY`].
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use tinymodbus_core::{FunctionCode, Mode, RequestWriter};
///
/// let mut buf = BytesMut::with_capacity(tinymodbus_core::BUFFER_CAPACITY);
/// let mut writer = RequestWriter::start(&mut buf, Mode::Rtu, 1, 0, FunctionCode::ReadHoldingRegisters)?;
/// writer.put_u16(0x0000)?;
/// writer.put_u16(0x0001)?;
/// let len = writer.finish()?;
///
/// assert_eq!(&buf[..len], &[0x01, 0x03, 0x00, 0x00, 0x00, 0x01, 0x84, 0x0A]);
/// # Ok::<(), tinymodbus_core::Error>(())
/// ```
#[derive(Debug)]
pub struct RequestWriter<'a> {
    buf: &'a mut BytesMut,
    mode: Mode,
    function: FunctionCode,
}

impl<'a> RequestWriter<'a> {
    /// Clear `buf` and write the mode-specific header plus the function code
    ///
    /// `transaction_id` is only written in TCP mode.
    pub fn start(
        buf: &'a mut BytesMut,
        mode: Mode,
        unit_id: u8,
        transaction_id: u16,
        function: FunctionCode,
    ) -> Result<Self> {
        buf.clear();

        let mut writer = Self {
            buf,
            mode,
            function,
        };

        match mode {
            Mode::Tcp => {
                writer.put_u16(transaction_id)?;
                writer.put_u16(TCP_PROTOCOL_ID)?;
                // Length placeholder, patched in finish()
                writer.put_u16(0)?;
                writer.put_u8(unit_id)?;
            }
            Mode::Rtu => {
                writer.put_u8(unit_id)?;
            }
        }

        writer.put_u8(function.code())?;
        Ok(writer)
    }

    /// Function code of the request being written
    pub fn function(&self) -> FunctionCode {
        self.function
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing was written (never true after `start`)
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append one byte
    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.reserve(1)?;
        self.buf.put_u8(value);
        Ok(())
    }

    /// Append a big-endian 16-bit field
    pub fn put_u16(&mut self, value: u16) -> Result<()> {
        self.reserve(2)?;
        self.buf.put_u16(value);
        Ok(())
    }

    /// Append raw bytes
    pub fn put_slice(&mut self, data: &[u8]) -> Result<()> {
        self.reserve(data.len())?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Complete the frame and return its total length
    ///
    /// TCP: patches the MBAP length. RTU: appends the CRC, low byte first.
    pub fn finish(mut self) -> Result<usize> {
        match self.mode {
            Mode::Tcp => {
                let length = (self.buf.len() - MBAP_PREFIX_SIZE) as u16;
                BigEndian::write_u16(
                    &mut self.buf[MBAP_LENGTH_OFFSET..MBAP_LENGTH_OFFSET + 2],
                    length,
                );
            }
            Mode::Rtu => {
                let crc = checksum::crc16(&self.buf[..]);
                self.reserve(self.mode.trailer_len())?;
                self.buf.put_u16_le(crc);
            }
        }

        trace!(
            mode = %self.mode,
            function = %self.function,
            frame = hex::encode(&self.buf[..]),
            "Encoded request"
        );

        Ok(self.buf.len())
    }

    fn reserve(&self, additional: usize) -> Result<()> {
        let size = self.buf.len() + additional;
        if size > BUFFER_CAPACITY {
            return Err(Error::FrameTooLarge {
                size,
                max: BUFFER_CAPACITY,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode_read(mode: Mode, transaction_id: u16, address: u16) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(BUFFER_CAPACITY);
        let mut writer = RequestWriter::start(
            &mut buf,
            mode,
            0x11,
            transaction_id,
            FunctionCode::ReadHoldingRegisters,
        )
        .unwrap();
        writer.put_u16(address).unwrap();
        writer.put_u16(1).unwrap();
        let len = writer.finish().unwrap();
        buf[..len].to_vec()
    }

    #[test]
    fn test_tcp_read_request() {
        let frame = encode_read(Mode::Tcp, 0x0102, 0x006B);

        assert_eq!(
            frame,
            vec![
                0x01, 0x02, // transaction id
                0x00, 0x00, // protocol id
                0x00, 0x06, // length
                0x11, // unit id
                0x03, // function
                0x00, 0x6B, // address
                0x00, 0x01, // quantity
            ]
        );
    }

    #[test]
    fn test_rtu_read_request() {
        let frame = encode_read(Mode::Rtu, 0xFFFF, 0x006B);

        assert_eq!(&frame[..6], &[0x11, 0x03, 0x00, 0x6B, 0x00, 0x01]);
        let crc = checksum::crc16(&frame[..6]);
        assert_eq!(&frame[6..], &crc.to_le_bytes());
        assert!(checksum::verify(&frame));
    }

    #[test]
    fn test_rtu_ignores_transaction_id() {
        assert_eq!(encode_read(Mode::Rtu, 1, 7), encode_read(Mode::Rtu, 2, 7));
    }

    #[test]
    fn test_start_clears_previous_frame() {
        let mut buf = BytesMut::with_capacity(BUFFER_CAPACITY);
        buf.put_slice(&[0xAA; 40]);

        let writer =
            RequestWriter::start(&mut buf, Mode::Rtu, 1, 0, FunctionCode::WriteSingleRegister)
                .unwrap();
        assert_eq!(writer.len(), 2);
        assert_eq!(writer.function(), FunctionCode::WriteSingleRegister);
    }

    #[test]
    fn test_tcp_length_counts_payload() {
        let mut buf = BytesMut::with_capacity(BUFFER_CAPACITY);
        let mut writer =
            RequestWriter::start(&mut buf, Mode::Tcp, 1, 9, FunctionCode::WriteSingleRegister)
                .unwrap();
        writer.put_slice(&[0; 10]).unwrap();
        let len = writer.finish().unwrap();

        assert_eq!(len, 8 + 10);
        assert_eq!(BigEndian::read_u16(&buf[4..6]), 12);
    }

    #[test]
    fn test_overflow_rejected() {
        let mut buf = BytesMut::with_capacity(BUFFER_CAPACITY);
        let mut writer =
            RequestWriter::start(&mut buf, Mode::Tcp, 1, 1, FunctionCode::ReadHoldingRegisters)
                .unwrap();

        let room = BUFFER_CAPACITY - writer.len();
        writer.put_slice(&vec![0; room]).unwrap();

        assert_eq!(
            writer.put_u8(0),
            Err(Error::FrameTooLarge {
                size: BUFFER_CAPACITY + 1,
                max: BUFFER_CAPACITY,
            })
        );
    }

    #[test]
    fn test_rtu_crc_overflow_rejected() {
        let mut buf = BytesMut::with_capacity(BUFFER_CAPACITY);
        let mut writer =
            RequestWriter::start(&mut buf, Mode::Rtu, 1, 0, FunctionCode::ReadHoldingRegisters)
                .unwrap();

        let room = BUFFER_CAPACITY - writer.len() - 1;
        writer.put_slice(&vec![0; room]).unwrap();

        assert!(matches!(writer.finish(), Err(Error::FrameTooLarge { .. })));
    }
}
