//! Wobot BLE client - discovery, connections, and device control.
//!
//! This crate drives real peripherals over btleplug using the frames and
//! records from wobot-proto. Each device object serializes its own command
//! traffic: one write, at most one response notification, never interleaved.

pub mod channel;
pub mod device;
pub mod error;
pub mod scan;
pub mod transport;

pub use channel::{CommandChannel, ConnectionState};
pub use device::Device;
pub use error::Error;
pub use scan::{default_adapter, discover, DiscoveredDevice, DiscoveryOptions};
pub use transport::{BtleTransport, Transport, TransportError};

// Re-export the protocol layer so callers need only one dependency.
pub use wobot_proto;
