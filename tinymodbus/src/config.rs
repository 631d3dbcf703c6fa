//! Session configuration

use tinymodbus_core::Mode;
use tinymodbus_transport::Transport;

use crate::client::Client;
use crate::error::{Error, Result};

/// Immutable per-session settings
///
/// # Examples
///
/// ```
/// use tinymodbus::{ClientConfig, Mode};
///
/// let config = ClientConfig::tcp(1);
/// assert_eq!(config.mode, Mode::Tcp);
///
/// let config = ClientConfig::rtu(1).with_unit_id(17);
/// assert_eq!(config.unit_id, 17);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Framing mode
    pub mode: Mode,

    /// Unit (slave) address of the target device
    pub unit_id: u8,
}

impl ClientConfig {
    pub fn new(mode: Mode, unit_id: u8) -> Self {
        Self { mode, unit_id }
    }

    /// Modbus TCP framing
    pub fn tcp(unit_id: u8) -> Self {
        Self::new(Mode::Tcp, unit_id)
    }

    /// Modbus RTU framing
    pub fn rtu(unit_id: u8) -> Self {
        Self::new(Mode::Rtu, unit_id)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = unit_id;
        self
    }
}

/// Step-by-step client construction
///
/// [`build`](Self::build) fails with [`Error::InvalidArgument`] when the
/// mode, unit id or transport was never provided.
///
/// ```
/// use std::io::Cursor;
/// use tinymodbus::{ClientBuilder, IoTransport, Mode};
///
/// let client = ClientBuilder::new()
///     .mode(Mode::Rtu)
///     .unit_id(1)
///     .transport(IoTransport::new(Cursor::new(Vec::new())))
///     .build()?;
/// assert_eq!(client.config().unit_id, 1);
///
/// let missing = ClientBuilder::<IoTransport<Cursor<Vec<u8>>>>::new()
///     .mode(Mode::Tcp)
///     .unit_id(1)
///     .build();
/// assert!(missing.is_err());
/// # Ok::<(), tinymodbus::Error>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder<T> {
    mode: Option<Mode>,
    unit_id: Option<u8>,
    transport: Option<T>,
}

impl<T: Transport> ClientBuilder<T> {
    pub fn new() -> Self {
        Self {
            mode: None,
            unit_id: None,
            transport: None,
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Client<T>> {
        let mode = self.mode.ok_or(Error::InvalidArgument("framing mode not set"))?;
        let unit_id = self.unit_id.ok_or(Error::InvalidArgument("unit id not set"))?;
        let transport = self
            .transport
            .ok_or(Error::InvalidArgument("transport not set"))?;

        Ok(Client::new(ClientConfig::new(mode, unit_id), transport))
    }
}

impl<T: Transport> Default for ClientBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
