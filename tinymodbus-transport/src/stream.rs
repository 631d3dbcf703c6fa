//! Transport over any blocking `Read + Write` stream

use std::io::{Read, Write};

use tracing::trace;

use crate::{error::*, Transport};

/// Adapts a blocking byte stream to [`Transport`]
///
/// `send` writes the whole frame and flushes; `receive` reads exactly the
/// requested length. Timeouts are whatever the stream is configured with.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use tinymodbus_transport::{IoTransport, Transport};
///
/// let mut transport = IoTransport::new(Cursor::new(vec![0x01, 0x03]));
/// let mut buf = [0u8; 2];
/// assert_eq!(transport.receive(&mut buf).unwrap(), 2);
/// assert_eq!(buf, [0x01, 0x03]);
/// ```
#[derive(Debug)]
pub struct IoTransport<S> {
    stream: S,
}

impl<S> IoTransport<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Mutably borrow the underlying stream
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> Transport for IoTransport<S> {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        trace!("Sending {} bytes: {}", data.len(), hex::encode(data));

        self.stream.write_all(data).map_err(Error::from_io)?;
        self.stream.flush().map_err(Error::from_io)?;

        Ok(data.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.stream.read_exact(buf).map_err(Error::from_io)?;

        trace!("Received {} bytes: {}", buf.len(), hex::encode(&buf[..]));

        Ok(buf.len())
    }
}
