//! Test doubles shared by unit tests

use std::collections::VecDeque;

use tinymodbus_core::checksum;
use tinymodbus_transport::{Result, Transport};

/// Replays canned response bytes and records every request
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    pub sent: Vec<Vec<u8>>,
    pub responses: VecDeque<u8>,
    pub receive_calls: usize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response frame
    pub fn push_response(&mut self, frame: &[u8]) {
        self.responses.extend(frame);
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        self.sent.push(data.to_vec());
        Ok(data.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.receive_calls += 1;

        let n = buf.len().min(self.responses.len());
        for (slot, byte) in buf.iter_mut().zip(self.responses.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

/// MBAP header + PDU
pub(crate) fn tcp_frame(transaction_id: u16, unit_id: u8, pdu: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(7 + pdu.len());
    frame.extend_from_slice(&transaction_id.to_be_bytes());
    frame.extend_from_slice(&[0x00, 0x00]);
    frame.extend_from_slice(&(pdu.len() as u16 + 1).to_be_bytes());
    frame.push(unit_id);
    frame.extend_from_slice(pdu);
    frame
}

/// Unit id + PDU + CRC
pub(crate) fn rtu_frame(unit_id: u8, pdu: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(3 + pdu.len());
    frame.push(unit_id);
    frame.extend_from_slice(pdu);
    let crc = checksum::crc16(&frame);
    frame.extend_from_slice(&crc.to_le_bytes());
    frame
}
