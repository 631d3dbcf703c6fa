//! High-level client interface

use tracing::debug;

use tinymodbus_transport::Transport;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::operation::{Operation, ReadHoldingRegister, WriteSingleRegister};
use crate::transaction::{Transaction, TransactionState};

/// Modbus client session
///
/// Owns the transport and one [`Transaction`] context. Every call performs
/// exactly one request and one response; there are no retries. Methods take
/// `&mut self`, so a session never runs two transactions at once. Use
/// [`SharedClient`](crate::SharedClient) to share a session across threads.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tinymodbus::{Client, ClientConfig, TcpTransport};
///
/// fn main() -> tinymodbus::Result<()> {
///     let transport = TcpTransport::connect("127.0.0.1:502", Duration::from_secs(2))?;
///     let mut client = Client::new(ClientConfig::tcp(1), transport);
///
///     client.write_single_register(0, 42)?;
///     assert_eq!(client.read_holding_register(0)?, 42);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
    transaction: Transaction,
}

impl<T: Transport> Client<T> {
    /// Create a session; the configuration is fixed for its lifetime
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            transaction: Transaction::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// State reached by the last transaction
    pub fn state(&self) -> TransactionState {
        self.transaction.state()
    }

    /// Transaction id of the last TCP request
    pub fn transaction_id(&self) -> u16 {
        self.transaction.transaction_id()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Close the session and hand the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Run any [`Operation`] as one transaction
    pub fn execute<O: Operation>(&mut self, op: &O) -> Result<O::Output> {
        debug!(
            unit_id = self.config.unit_id,
            function = %op.function(),
            "Executing operation"
        );

        let decoded = {
            let mut body = self.transaction.execute(
                &mut self.transport,
                &self.config,
                op.function(),
                op.response_len(),
                |frame| op.encode(frame),
            )?;
            op.decode(&mut body)
        };

        decoded.map_err(|err| {
            let err = Error::from(err);
            self.transaction.reject(&err);
            err
        })
    }

    /// Read one holding register (function 0x03)
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The transport fails or transfers fewer bytes than requested
    /// - The response fails its CRC / MBAP length check
    /// - The device reports an exception
    /// - The byte count is not 2
    pub fn read_holding_register(&mut self, address: u16) -> Result<u16> {
        self.execute(&ReadHoldingRegister::new(address))
    }

    /// Write one holding register (function 0x06)
    ///
    /// The device must echo the address and value back; anything else is an
    /// invalid response.
    pub fn write_single_register(&mut self, address: u16, value: u16) -> Result<()> {
        self.execute(&WriteSingleRegister::new(address, value))
    }
}
