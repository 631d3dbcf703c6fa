//! Framing modes and their byte accounting

use std::fmt;

use crate::constants::{CRC_SIZE, EXCEPTION_CODE_SIZE, MBAP_HEADER_SIZE};

/// Modbus framing mode
///
/// # Response byte accounting
///
/// Responses are read in two receives: a fixed header that ends with the
/// function code, then a body whose size depends on that function code.
///
/// ```text
///        header (1st receive)                       body (2nd receive)
/// TCP    txn(2) proto(2) len(2) unit(1) fc(1) = 8   normal: N       exception: 1
/// RTU    unit(1) fc(1)                        = 2   normal: N + 2   exception: 1 + 2
/// ```
///
/// `N` is the number of payload bytes that follow the function code in a
/// normal response. RTU bodies include the CRC trailer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Serial framing with unit id prefix and CRC-16 trailer
    Rtu,

    /// MBAP-prefixed framing over a reliable stream
    Tcp,
}

impl Mode {
    /// Bytes read before the body size is known (ends with the function code)
    pub fn header_len(self) -> usize {
        match self {
            Self::Rtu => 2,
            Self::Tcp => MBAP_HEADER_SIZE + 1,
        }
    }

    /// Bytes read after the header
    ///
    /// `expected_len` is the payload size of a normal response, excluding the
    /// function code.
    pub fn body_len(self, expected_len: usize, exception: bool) -> usize {
        let payload = if exception {
            EXCEPTION_CODE_SIZE
        } else {
            expected_len
        };

        match self {
            Self::Rtu => payload + CRC_SIZE,
            Self::Tcp => payload,
        }
    }

    /// Bytes appended after the payload of a request
    pub fn trailer_len(self) -> usize {
        match self {
            Self::Rtu => CRC_SIZE,
            Self::Tcp => 0,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rtu => write!(f, "RTU"),
            Self::Tcp => write!(f, "TCP"),
        }
    }
}
