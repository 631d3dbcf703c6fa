//! Transport layer for Modbus clients
//!
//! The protocol engine only needs two blocking primitives: send a whole
//! frame and receive an exact number of bytes. [`Transport`] captures that
//! contract; [`IoTransport`] implements it for any `Read + Write` stream
//! (TCP socket, serial device file, in-memory pipe).

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Error, Result};
pub use stream::IoTransport;
pub use tcp::TcpTransport;

/// Blocking byte transport
///
/// Both methods must block until the full length has been transferred or
/// a terminal error occurs. A count smaller than requested is treated by
/// the engine as a failed transaction, never retried.
///
/// State the implementation needs (socket, port handle, user context) lives
/// in `self`.
pub trait Transport {
    /// Send all of `data`, returning the number of bytes written
    fn send(&mut self, data: &[u8]) -> Result<usize>;

    /// Fill `buf` completely, returning the number of bytes read
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        (**self).send(data)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).receive(buf)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        (**self).send(data)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).receive(buf)
    }
}
