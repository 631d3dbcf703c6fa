//! Request/response transaction engine
//!
//! One call to [`Transaction::execute`] performs exactly one exchange:
//!
//! ```text
//! Idle -> Built -> Sent -> HeaderReceived -> BodyReceived -> Validated -> Completed
//!                                                                      \-> Failed
//! ```
//!
//! Any step may end in `Failed`; the next call starts over from `Built` with
//! a cleared buffer. Response fields are only exposed after the CRC (RTU) or
//! MBAP length (TCP) check passed.

use std::ops::Range;

use bytes::BytesMut;
use tracing::{debug, trace, warn};

use tinymodbus_core::{
    BUFFER_CAPACITY, FieldReader, FunctionCode, Mode, RequestWriter, ResponseHeader,
    response::verify_frame,
};
use tinymodbus_transport::Transport;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Transaction state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction run yet
    Idle,

    /// Request frame encoded in the buffer
    Built,

    /// Whole request accepted by the transport
    Sent,

    /// Fixed response header received
    HeaderReceived,

    /// Rest of the response received
    BodyReceived,

    /// Integrity and function checks passed
    Validated,

    /// Response body ready for decoding
    Completed,

    /// Transaction ended with an error
    Failed,
}

/// Per-session transaction context
///
/// Owns the single frame buffer shared by requests and responses. The
/// transaction id is only used in TCP mode; it is incremented once per
/// request, whatever the outcome, and wraps after 0xFFFF.
#[derive(Debug)]
pub struct Transaction {
    buffer: BytesMut,
    transaction_id: u16,
    function: Option<FunctionCode>,
    expected_len: usize,
    state: TransactionState,
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(BUFFER_CAPACITY),
            transaction_id: 0,
            function: None,
            expected_len: 0,
            state: TransactionState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Transaction id of the last TCP request (0 before the first one)
    pub fn transaction_id(&self) -> u16 {
        self.transaction_id
    }

    /// Function code of the last request
    pub fn function(&self) -> Option<FunctionCode> {
        self.function
    }

    /// Payload bytes expected after the function code of the last request
    pub fn expected_len(&self) -> usize {
        self.expected_len
    }

    /// Run one request/response exchange
    ///
    /// `encode` appends the request payload after the function code.
    /// `expected_len` is the size of a normal response payload after the
    /// function code. On success the returned reader covers exactly that
    /// payload.
    pub fn execute<T, F>(
        &mut self,
        transport: &mut T,
        config: &ClientConfig,
        function: FunctionCode,
        expected_len: usize,
        encode: F,
    ) -> Result<FieldReader<'_>>
    where
        T: Transport + ?Sized,
        F: FnOnce(&mut RequestWriter<'_>) -> tinymodbus_core::Result<()>,
    {
        match self.exchange(transport, config, function, expected_len, encode) {
            Ok(body) => {
                self.state = TransactionState::Completed;
                debug!(
                    transaction_id = self.transaction_id,
                    function = %function,
                    "Transaction completed"
                );
                Ok(FieldReader::new(&self.buffer[body]))
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Mark the transaction failed after a response was rejected by its decoder
    pub fn reject(&mut self, err: &Error) {
        self.fail(err);
    }

    fn fail(&mut self, err: &Error) {
        warn!(
            state = ?self.state,
            transaction_id = self.transaction_id,
            error = %err,
            "Transaction failed"
        );
        self.state = TransactionState::Failed;
    }

    fn exchange<T, F>(
        &mut self,
        transport: &mut T,
        config: &ClientConfig,
        function: FunctionCode,
        expected_len: usize,
        encode: F,
    ) -> Result<Range<usize>>
    where
        T: Transport + ?Sized,
        F: FnOnce(&mut RequestWriter<'_>) -> tinymodbus_core::Result<()>,
    {
        let mode = config.mode;
        let request_len = self.build(config, function, expected_len, encode)?;

        let sent = transport
            .send(&self.buffer[..request_len])
            .map_err(Error::SendIo)?;
        if sent != request_len {
            return Err(Error::Send {
                sent,
                expected: request_len,
            });
        }
        self.state = TransactionState::Sent;

        // The response overwrites the request
        let header_len = mode.header_len();
        self.buffer.clear();
        self.buffer.resize(header_len, 0);
        self.receive_into(transport, 0..header_len)?;
        self.state = TransactionState::HeaderReceived;

        let header = ResponseHeader::decode(mode, &self.buffer[..header_len])?;
        header.validate(config.unit_id, self.transaction_id)?;

        let frame_len = header_len + mode.body_len(expected_len, header.is_exception());
        if frame_len > BUFFER_CAPACITY {
            return Err(tinymodbus_core::Error::FrameTooLarge {
                size: frame_len,
                max: BUFFER_CAPACITY,
            }
            .into());
        }
        self.buffer.resize(frame_len, 0);
        self.receive_into(transport, header_len..frame_len)?;
        self.state = TransactionState::BodyReceived;

        let frame = &self.buffer[..frame_len];
        verify_frame(mode, frame)?;
        header.check_function(function, &frame[header_len..])?;
        self.state = TransactionState::Validated;

        Ok(header_len..header_len + expected_len)
    }

    fn build<F>(
        &mut self,
        config: &ClientConfig,
        function: FunctionCode,
        expected_len: usize,
        encode: F,
    ) -> Result<usize>
    where
        F: FnOnce(&mut RequestWriter<'_>) -> tinymodbus_core::Result<()>,
    {
        self.function = Some(function);
        self.expected_len = expected_len;

        let transaction_id = match config.mode {
            Mode::Tcp => {
                self.transaction_id = self.transaction_id.wrapping_add(1);
                self.transaction_id
            }
            Mode::Rtu => 0,
        };

        let mut writer = RequestWriter::start(
            &mut self.buffer,
            config.mode,
            config.unit_id,
            transaction_id,
            function,
        )?;
        encode(&mut writer)?;
        let request_len = writer.finish()?;

        self.state = TransactionState::Built;
        debug!(
            mode = %config.mode,
            unit_id = config.unit_id,
            transaction_id,
            function = %function,
            request_len,
            "Request built"
        );

        Ok(request_len)
    }

    fn receive_into<T>(&mut self, transport: &mut T, range: Range<usize>) -> Result<()>
    where
        T: Transport + ?Sized,
    {
        let expected = range.len();
        let buf = &mut self.buffer[range];

        let received = transport.receive(buf).map_err(Error::ReceiveIo)?;
        if received != expected {
            return Err(Error::Receive { received, expected });
        }

        trace!("Received {} bytes: {}", received, hex::encode(&buf[..]));
        Ok(())
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}
