//! BLE GATT constants shared by every device family.
//!
//! All devices expose one vendor service with a write characteristic for
//! command frames and a notify characteristic for responses.

/// Vendor Service UUID
pub const SERVICE_UUID: &str = "cba20d00-224d-11e6-9fb8-0002a5d5c51b";

/// Command Characteristic UUID (write)
pub const WRITE_UUID: &str = "cba20002-224d-11e6-9fb8-0002a5d5c51b";

/// Response Characteristic UUID (notify)
pub const NOTIFY_UUID: &str = "cba20003-224d-11e6-9fb8-0002a5d5c51b";

/// GAP Device Name Characteristic UUID (read)
pub const DEVICE_NAME_UUID: &str = "00002a00-0000-1000-8000-00805f9b34fb";

/// Service-data UUID the devices advertise under (16-bit 0xfd3d).
pub const ADVERTISEMENT_SERVICE_UUID: &str = "0000fd3d-0000-1000-8000-00805f9b34fb";

/// Company identifier prefixing manufacturer data on the wire,
/// little-endian in the advertisement.
pub const COMPANY_ID: u16 = 0x0969;

/// How long to wait for the response notification to one command.
pub const COMMAND_TIMEOUT_MS: u64 = 3000;

/// Command frame header bytes.
pub mod commands {
    /// First byte of every command frame ("magic").
    pub const HEAD: u8 = 0x57;

    /// Second byte of an unencrypted extended command.
    pub const EXTENDED: u8 = 0x0f;

    /// Second byte of a plain (never-encrypted) command.
    pub const PLAIN: u8 = 0x0e;
}
