//! # tinymodbus
//!
//! Minimal blocking Modbus client for RTU and TCP framing.
//!
//! ## Features
//!
//! - Read one holding register (0x03) and write one register (0x06)
//! - RTU framing with CRC-16, TCP framing with MBAP header
//! - Bring-your-own transport through a two-method [`Transport`] trait
//! - Device exceptions surfaced as typed [`Exception`] values
//! - One request, one response per call: no retries, no background work
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use tinymodbus::{Client, ClientConfig, TcpTransport};
//!
//! fn main() -> tinymodbus::Result<()> {
//!     let transport = TcpTransport::connect("192.168.1.50:502", Duration::from_secs(2))?;
//!     let mut client = Client::new(ClientConfig::tcp(1), transport);
//!
//!     // Registers are zero-based
//!     client.write_single_register(0, 42)?;
//!     let value = client.read_holding_register(0)?;
//!     println!("register 0 = {}", value);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod operation;
pub mod shared;
pub mod transaction;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use client::Client;
pub use config::{ClientBuilder, ClientConfig};
pub use error::{Error, Result};
pub use operation::{Operation, ReadHoldingRegister, WriteSingleRegister};
pub use shared::SharedClient;
pub use transaction::{Transaction, TransactionState};

// Re-export protocol and transport types
pub use tinymodbus_core::{Exception, FunctionCode, Mode};
pub use tinymodbus_transport::{IoTransport, TcpTransport, Transport};
