//! # tinymodbus-core
//!
//! Core protocol implementation for Modbus RTU and Modbus TCP clients.
//!
//! This crate provides the low-level protocol primitives:
//! - CRC-16 calculation for RTU framing
//! - Request encoding (MBAP header or CRC trailer)
//! - Response header decoding and validation
//! - Function and exception code definitions
//! - Protocol constants

pub mod checksum;
pub mod constants;
pub mod error;
pub mod exception;
pub mod frame;
pub mod function;
pub mod mode;
pub mod response;

pub use error::{Error, Result};
pub use exception::Exception;
pub use frame::RequestWriter;
pub use function::FunctionCode;
pub use mode::Mode;
pub use response::{FieldReader, Mbap, ResponseHeader};

/// Default Modbus TCP port
pub const DEFAULT_TCP_PORT: u16 = 502;

/// Capacity of the shared request/response buffer
pub const BUFFER_CAPACITY: usize = 256;
