//! Thread-shareable client

use std::sync::Arc;

use parking_lot::Mutex;

use tinymodbus_transport::Transport;

use crate::client::Client;
use crate::error::Result;
use crate::operation::Operation;

/// A [`Client`] behind a mutex
///
/// Cloning is cheap (Arc internally) and every clone talks to the same
/// session. The lock is held for a whole transaction, so requests from
/// different threads are serialized and never interleave on the wire.
#[derive(Debug)]
pub struct SharedClient<T> {
    inner: Arc<Mutex<Client<T>>>,
}

impl<T: Transport> SharedClient<T> {
    pub fn new(client: Client<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Read one holding register
    pub fn read_holding_register(&self, address: u16) -> Result<u16> {
        self.inner.lock().read_holding_register(address)
    }

    /// Write one holding register
    pub fn write_single_register(&self, address: u16, value: u16) -> Result<()> {
        self.inner.lock().write_single_register(address, value)
    }

    /// Run any operation
    pub fn execute<O: Operation>(&self, op: &O) -> Result<O::Output> {
        self.inner.lock().execute(op)
    }

    /// Run several transactions without another thread getting in between
    pub fn with_client<R>(&self, f: impl FnOnce(&mut Client<T>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<T> Clone for SharedClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> From<Client<T>> for SharedClient<T> {
    fn from(client: Client<T>) -> Self {
        Self::new(client)
    }
}
