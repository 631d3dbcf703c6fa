//! Modbus RTU example over a serial device file
//!
//! The port must already be configured (baud rate, parity, raw mode),
//! e.g. `stty -F /dev/ttyUSB0 9600 raw -echo`.

use std::fs::OpenOptions;

use tinymodbus::{ClientBuilder, IoTransport, Mode};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::var("MODBUS_SERIAL").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let unit_id = std::env::var("MODBUS_UNIT")
        .ok()
        .and_then(|unit| unit.parse().ok())
        .unwrap_or(1);

    println!("Opening {} (unit {})...", path, unit_id);
    let port = OpenOptions::new().read(true).write(true).open(&path)?;

    let mut client = ClientBuilder::new()
        .mode(Mode::Rtu)
        .unit_id(unit_id)
        .transport(IoTransport::new(port))
        .build()?;

    client.write_single_register(1, 1234)?;
    println!("✓ Wrote 1234 to register 1");

    match client.read_holding_register(1) {
        Ok(value) => println!("✓ Register 1 = {}", value),
        Err(err) => match err.exception() {
            Some(exception) => println!("✗ Device exception: {}", exception),
            None => return Err(err.into()),
        },
    }

    Ok(())
}
