//! Watch - print every advertisement this machine can hear
//!
//! Usage:
//!   cargo run --example watch -p wobot-ble -- [seconds-per-window]
//!
//! Scans in windows (default 5 seconds) and prints one JSON line per device
//! seen in each window. Runs until interrupted. Payloads that fail to decode
//! go to stderr and are skipped.

use std::time::Duration;

use wobot_ble::{default_adapter, discover, DiscoveryOptions};
use wobot_proto::{DecodeError, Model};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    let seconds = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<u64>()?,
        None => 5,
    };

    let adapter = default_adapter().await?;
    let options = DiscoveryOptions {
        duration: Duration::from_secs(seconds),
        ..DiscoveryOptions::default()
    };
    let sink = |model: Model, error: &DecodeError| {
        eprintln!("failed to decode a {} advertisement: {}", model.name(), error);
    };

    println!("Scanning in {seconds}-second windows, ctrl-c to stop.");
    loop {
        for device in discover(&adapter, &options, &sink).await? {
            let line = serde_json::to_string(&device.status)?;
            match device.rssi {
                Some(rssi) => println!("{} [{} dBm] {}", device.address, rssi, line),
                None => println!("{} {}", device.address, line),
            }
        }
    }
}
