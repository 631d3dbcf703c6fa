//! End-to-end tests against a simulated device

mod common;

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tinymodbus::{
    Client, ClientBuilder, ClientConfig, Error, Exception, Mode, TcpTransport, TransactionState,
};

use common::SimulatedDevice;

#[test]
fn write_then_read_tcp() {
    let device = SimulatedDevice::new(Mode::Tcp, 1, 16);
    let mut client = Client::new(ClientConfig::tcp(1), device);

    client.write_single_register(0, 42).unwrap();
    let first_id = client.transaction_id();

    assert_eq!(client.read_holding_register(0).unwrap(), 42);
    assert_eq!(client.transaction_id(), first_id + 1);

    let device = client.into_transport();
    assert_eq!(device.requests.len(), 2);
    assert_eq!(device.registers[0], 42);
}

#[test]
fn write_then_read_rtu() {
    let device = SimulatedDevice::new(Mode::Rtu, 0x11, 16);
    let mut client = ClientBuilder::new()
        .mode(Mode::Rtu)
        .unit_id(0x11)
        .transport(device)
        .build()
        .unwrap();

    client.write_single_register(3, 0xBEEF).unwrap();
    assert_eq!(client.read_holding_register(3).unwrap(), 0xBEEF);
    assert_eq!(client.read_holding_register(4).unwrap(), 0);
    assert_eq!(client.transaction_id(), 0);
}

#[test]
fn out_of_range_address_is_device_exception() {
    for mode in [Mode::Tcp, Mode::Rtu] {
        let device = SimulatedDevice::new(mode, 1, 4);
        let mut client = Client::new(ClientConfig::new(mode, 1), device);

        let err = client.read_holding_register(100).unwrap_err();
        assert_eq!(err.exception(), Some(Exception::IllegalDataAddress));

        let err = client.write_single_register(100, 1).unwrap_err();
        assert_eq!(err.exception(), Some(Exception::IllegalDataAddress));

        // Session stays usable after device exceptions
        client.write_single_register(1, 5).unwrap();
        assert_eq!(client.read_holding_register(1).unwrap(), 5);
        assert_eq!(client.state(), TransactionState::Completed);
    }
}

#[test]
fn wrong_unit_is_rejected() {
    let device = SimulatedDevice::new(Mode::Rtu, 2, 4);
    let mut client = Client::new(ClientConfig::rtu(1), device);

    let err = client.read_holding_register(0).unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol(tinymodbus_core::Error::UnitIdMismatch {
            expected: 1,
            actual: 2,
        })
    ));
}

#[test]
fn transaction_ids_advance_by_one() {
    let device = SimulatedDevice::new(Mode::Tcp, 1, 4);
    let mut client = Client::new(ClientConfig::tcp(1), device);

    for expected in 1..=5u16 {
        client.read_holding_register(0).unwrap();
        assert_eq!(client.transaction_id(), expected);
    }

    let device = client.into_transport();
    for (i, request) in device.requests.iter().enumerate() {
        assert_eq!(
            u16::from_be_bytes([request[0], request[1]]),
            i as u16 + 1
        );
        assert_eq!(&request[2..], &device.requests[0][2..]);
    }
}

/// Serve Modbus TCP requests from a simulated device over a real socket
fn spawn_tcp_device(connections: usize) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let mut device = SimulatedDevice::new(Mode::Tcp, 1, 8);

        for _ in 0..connections {
            let (mut socket, _) = listener.accept().unwrap();
            let mut header = [0u8; 6];

            while socket.read_exact(&mut header).is_ok() {
                let length = usize::from(u16::from_be_bytes([header[4], header[5]]));
                let mut rest = vec![0u8; length];
                socket.read_exact(&mut rest).unwrap();

                let mut request = header.to_vec();
                request.extend_from_slice(&rest);
                socket.write_all(&device.respond(&request)).unwrap();
            }
        }
    });

    addr
}

#[test]
fn write_then_read_over_tcp_socket() {
    let addr = spawn_tcp_device(1);

    let transport = TcpTransport::connect(addr, Duration::from_secs(2)).unwrap();
    let mut client = Client::new(ClientConfig::tcp(1), transport);

    client.write_single_register(0, 42).unwrap();
    assert_eq!(client.read_holding_register(0).unwrap(), 42);
    assert_eq!(client.transaction_id(), 2);
}
