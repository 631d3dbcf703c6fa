//! Protocol constants

/// Protocol identifier carried in every MBAP header (always zero for Modbus)
pub const TCP_PROTOCOL_ID: u16 = 0;

/// MBAP header size: transaction id, protocol id, length, unit id
pub const MBAP_HEADER_SIZE: usize = 7;

/// Offset of the length field inside the MBAP header
pub const MBAP_LENGTH_OFFSET: usize = 4;

/// Bytes of the MBAP header not counted by its own length field
/// (transaction id + protocol id + length)
pub const MBAP_PREFIX_SIZE: usize = 6;

/// RTU CRC trailer size
pub const CRC_SIZE: usize = 2;

/// Function code bit that marks an exception response
pub const EXCEPTION_BIT: u8 = 0x80;

/// Size of the exception code that replaces the payload in an exception response
pub const EXCEPTION_CODE_SIZE: usize = 1;

/// Quantity field used by single-register reads
pub const SINGLE_REGISTER_QUANTITY: u16 = 1;

/// Byte count a device reports for one register
pub const SINGLE_REGISTER_BYTE_COUNT: u8 = 2;
