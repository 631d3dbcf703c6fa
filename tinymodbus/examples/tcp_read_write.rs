//! Modbus TCP example: read, write, read back

use std::time::Duration;

use tinymodbus::{Client, ClientConfig, TcpTransport};
use tracing_subscriber::EnvFilter;

fn main() -> tinymodbus::Result<()> {
    // RUST_LOG=tinymodbus=trace shows every frame on the wire
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Change to your device address
    let addr = std::env::var("MODBUS_ADDR").unwrap_or_else(|_| "127.0.0.1:5020".to_string());

    println!("Connecting to {} via TCP...", addr);
    let transport = TcpTransport::connect(addr.as_str(), Duration::from_secs(2))?;
    let mut client = Client::new(ClientConfig::tcp(1), transport);
    println!("✓ Connected!");

    let value = client.read_holding_register(0)?;
    println!("✓ Register 0 = {}", value);

    client.write_single_register(0, 42)?;
    println!("✓ Wrote 42 to register 0");

    let value = client.read_holding_register(0)?;
    println!("✓ Register 0 = {} (transaction {})", value, client.transaction_id());

    Ok(())
}
