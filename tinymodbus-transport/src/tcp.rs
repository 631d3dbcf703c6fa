//! TCP transport

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::{IoTransport, error::*};

/// Blocking TCP transport for Modbus TCP devices
pub type TcpTransport = IoTransport<TcpStream>;

/// Default connect/read/write timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

impl IoTransport<TcpStream> {
    /// Connect to a Modbus TCP device
    ///
    /// The first resolved address is used. `timeout` applies to the connect
    /// and to every subsequent read and write.
    pub fn connect(addr: impl ToSocketAddrs, timeout: Duration) -> Result<Self> {
        let addr = resolve_addr(addr)?;

        debug!("Connecting to {}...", addr);

        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(Error::from_io)?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        debug!("Connected to {}", addr);

        Ok(Self::new(stream))
    }

    /// Remote device address
    pub fn remote_addr(&self) -> Result<SocketAddr> {
        Ok(self.get_ref().peer_addr()?)
    }
}

fn resolve_addr(addr: impl ToSocketAddrs) -> Result<SocketAddr> {
    addr.to_socket_addrs()
        .map_err(|e| Error::InvalidAddress(e.to_string()))?
        .next()
        .ok_or_else(|| Error::InvalidAddress("no addresses found".to_string()))
}
