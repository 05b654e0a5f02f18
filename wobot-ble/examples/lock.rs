//! Lock - drive a smart lock from the command line
//!
//! Usage:
//!   cargo run --example lock -p wobot-ble -- <address> name
//!   cargo run --example lock -p wobot-ble -- <address> <key-id> <key> <command>
//!
//! Commands:
//!   lock              - Throw the deadbolt
//!   unlock            - Retract the deadbolt and unlatch
//!   unlock-no-unlatch - Retract the deadbolt, leave the latch
//!   info              - Print calibration, state, and alarm bits
//!   name              - Print the GAP device name (no key needed)
//!
//! The key id and key come from the vendor app's pairing data: a 2-char and
//! a 32-char hex string.

use wobot_ble::{default_adapter, discover, BtleTransport, Device, DiscoveryOptions, Transport};
use wobot_proto::{DeviceKey, Model, NullSink};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage();
        std::process::exit(1);
    }
    let address = &args[1];

    if args[2] == "name" {
        return cmd_name(address).await;
    }
    if args.len() < 5 {
        print_usage();
        std::process::exit(1);
    }
    let key = DeviceKey::new(&args[2], &args[3])?;
    cmd_operate(address, key, &args[4]).await
}

fn print_usage() {
    eprintln!("Lock - drive a smart lock");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  lock <address> name");
    eprintln!("  lock <address> <key-id> <key> <lock|unlock|unlock-no-unlatch|info>");
}

async fn find_lock(address: &str) -> Result<(Model, BtleTransport), Box<dyn std::error::Error>> {
    let adapter = default_adapter().await?;
    let options = DiscoveryOptions {
        address: Some(address.to_string()),
        quick: true,
        ..DiscoveryOptions::default()
    };
    let found = discover(&adapter, &options, &NullSink).await?;
    let found = found
        .into_iter()
        .next()
        .ok_or_else(|| format!("no device advertising at {address}"))?;

    let model = found.status.model();
    if !matches!(model, Model::Lock | Model::LockPro) {
        return Err(format!("{address} is a {}, not a lock", model.display_name()).into());
    }
    println!("Found a {} at {}.", model.display_name(), found.address);
    Ok((model, BtleTransport::new(found.peripheral)))
}

async fn cmd_name(address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut transport) = find_lock(address).await?;
    transport.connect().await?;
    let name = transport.read_device_name().await?;
    println!("Device name: {name}");
    transport.disconnect().await?;
    Ok(())
}

async fn cmd_operate(
    address: &str,
    key: DeviceKey,
    command: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (model, transport) = find_lock(address).await?;
    let mut device = Device::with_key(model, transport, key);

    match command {
        "lock" => {
            device.lock().await?;
            println!("Locked.");
        }
        "unlock" => {
            device.unlock().await?;
            println!("Unlocked.");
        }
        "unlock-no-unlatch" => {
            device.unlock_without_unlatch().await?;
            println!("Unlocked without unlatching.");
        }
        "info" => {
            let info = device.info().await?;
            println!("calibration:    {}", info.calibration);
            println!("status:         {:?}", info.status);
            println!("door open:      {}", info.door_open);
            println!("unclosed alarm: {}", info.unclosed_alarm);
            println!("unlocked alarm: {}", info.unlocked_alarm);
        }
        _ => {
            eprintln!("Unknown command: {command}");
            std::process::exit(1);
        }
    }

    device.disconnect().await?;
    Ok(())
}
