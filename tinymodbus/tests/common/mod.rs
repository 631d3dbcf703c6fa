//! In-memory Modbus device used by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use tinymodbus::{Mode, Transport};
use tinymodbus_core::checksum;

/// Holding-register device that answers 0x03 and 0x06 requests
///
/// Out-of-range addresses get an illegal data address exception, other
/// function codes an illegal function exception.
#[derive(Debug)]
pub struct SimulatedDevice {
    mode: Mode,
    unit_id: u8,
    pub registers: Vec<u16>,
    pending: VecDeque<u8>,
    pub requests: Vec<Vec<u8>>,
}

impl SimulatedDevice {
    pub fn new(mode: Mode, unit_id: u8, registers: usize) -> Self {
        Self {
            mode,
            unit_id,
            registers: vec![0; registers],
            pending: VecDeque::new(),
            requests: Vec::new(),
        }
    }

    /// Build the complete response frame for a request frame
    pub fn respond(&mut self, request: &[u8]) -> Vec<u8> {
        match self.mode {
            Mode::Tcp => {
                let pdu = self.handle(&request[7..]);
                let mut frame = request[..4].to_vec();
                frame.extend_from_slice(&(pdu.len() as u16 + 1).to_be_bytes());
                frame.push(self.unit_id);
                frame.extend_from_slice(&pdu);
                frame
            }
            Mode::Rtu => {
                assert!(checksum::verify(request), "request CRC must be valid");
                let pdu = self.handle(&request[1..request.len() - 2]);
                let mut frame = vec![self.unit_id];
                frame.extend_from_slice(&pdu);
                let crc = checksum::crc16(&frame);
                frame.extend_from_slice(&crc.to_le_bytes());
                frame
            }
        }
    }

    fn handle(&mut self, pdu: &[u8]) -> Vec<u8> {
        let function = pdu[0];
        let address = usize::from(u16::from_be_bytes([pdu[1], pdu[2]]));
        let argument = u16::from_be_bytes([pdu[3], pdu[4]]);

        match function {
            0x03 => match self.registers.get(address) {
                Some(value) if argument == 1 => {
                    let [hi, lo] = value.to_be_bytes();
                    vec![0x03, 0x02, hi, lo]
                }
                _ => vec![0x83, 0x02],
            },
            0x06 => match self.registers.get_mut(address) {
                Some(slot) => {
                    *slot = argument;
                    pdu[..5].to_vec()
                }
                None => vec![0x86, 0x02],
            },
            other => vec![other | 0x80, 0x01],
        }
    }
}

impl Transport for SimulatedDevice {
    fn send(&mut self, data: &[u8]) -> tinymodbus_transport::Result<usize> {
        self.requests.push(data.to_vec());
        let response = self.respond(data);
        self.pending.extend(response);
        Ok(data.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> tinymodbus_transport::Result<usize> {
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}
