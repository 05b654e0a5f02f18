//! Discovery: scan the adapter and decode matching advertisements.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use btleplug::api::{Central, Manager as _, Peripheral as _, PeripheralProperties, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use uuid::Uuid;
use wobot_proto::ble::{ADVERTISEMENT_SERVICE_UUID, COMPANY_ID};
use wobot_proto::{decode, decode_as, Advertisement, DeviceStatus, DiagnosticSink, Model};

use crate::transport::TransportError;

/// How often the scan loop re-reads the adapter's peripheral cache.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Filters for one discovery pass and when it stops.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Scan window; the pass returns when it elapses.
    pub duration: Duration,
    /// Only report this model. Asking for the keypad also re-routes the
    /// `0x26` payload byte it shares with the leak detector.
    pub model: Option<Model>,
    /// Only report this address, compared case- and separator-insensitively.
    pub address: Option<String>,
    /// Return as soon as anything matches instead of waiting out the window.
    pub quick: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        DiscoveryOptions {
            duration: Duration::from_millis(5000),
            model: None,
            address: None,
            quick: false,
        }
    }
}

/// One peripheral seen during a pass, carrying its latest decoded record.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    pub peripheral: Peripheral,
    pub address: String,
    pub local_name: Option<String>,
    pub rssi: Option<i16>,
    pub status: DeviceStatus,
}

/// First Bluetooth adapter on the host.
pub async fn default_adapter() -> Result<Adapter, TransportError> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;
    adapters
        .into_iter()
        .next()
        .ok_or(TransportError::AdapterMissing)
}

/// Scans for `options.duration`, decoding every advertisement that passes
/// the filters. Decode failures go to `sink` and the peripheral is skipped;
/// they never abort the pass. An empty result is not an error.
pub async fn discover(
    adapter: &Adapter,
    options: &DiscoveryOptions,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<DiscoveredDevice>, TransportError> {
    let advertised = parse_uuid(ADVERTISEMENT_SERVICE_UUID);
    adapter.start_scan(ScanFilter::default()).await?;

    let deadline = Instant::now() + options.duration;
    let mut found: HashMap<String, DiscoveredDevice> = HashMap::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        tokio::time::sleep(remaining.min(POLL_INTERVAL)).await;

        for peripheral in adapter.peripherals().await? {
            let Some(properties) = peripheral.properties().await? else {
                continue;
            };
            if let Some(device) = inspect(peripheral, &properties, &advertised, options, sink) {
                found.insert(device.address.clone(), device);
            }
        }
        if options.quick && !found.is_empty() {
            break;
        }
    }
    adapter.stop_scan().await?;

    let mut devices: Vec<DiscoveredDevice> = found.into_values().collect();
    devices.sort_by(|a, b| a.address.cmp(&b.address));
    tracing::debug!(count = devices.len(), "scan finished");
    Ok(devices)
}

fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("invalid UUID in wobot_proto")
}

fn inspect(
    peripheral: Peripheral,
    properties: &PeripheralProperties,
    advertised: &Uuid,
    options: &DiscoveryOptions,
    sink: &dyn DiagnosticSink,
) -> Option<DiscoveredDevice> {
    let address = peripheral.address().to_string();
    if let Some(wanted) = &options.address {
        if normalize_address(&address) != normalize_address(wanted) {
            return None;
        }
    }

    let service_data = service_payload(&properties.service_data, advertised)?;
    let manufacturer_data = manufacturer_payload(&properties.manufacturer_data);
    let frame = Advertisement {
        service_data,
        manufacturer_data: &manufacturer_data,
    };
    let record = match options.model {
        // The keypad stamps the leak detector's payload byte, so it is
        // only decodable when asked for explicitly.
        Some(Model::Keypad) => {
            if service_data.first() != Some(&0x26) {
                return None;
            }
            decode_as(Model::Keypad, frame, sink)
        }
        _ => decode(frame, sink),
    };
    let status = record.ok()?;
    if let Some(filter) = options.model {
        if status.model() != filter {
            return None;
        }
    }

    Some(DiscoveredDevice {
        address,
        local_name: properties.local_name.clone(),
        rssi: properties.rssi,
        status,
        peripheral,
    })
}

/// Picks the service-data payload: the advertised UUID when present, else a
/// lone entry keyed however the host stack reported it.
fn service_payload<'a>(
    service_data: &'a HashMap<Uuid, Vec<u8>>,
    advertised: &Uuid,
) -> Option<&'a [u8]> {
    if let Some(payload) = service_data.get(advertised) {
        return Some(payload);
    }
    if service_data.len() == 1 {
        return service_data.values().next().map(Vec::as_slice);
    }
    None
}

/// Re-prepends the little-endian company id the host stack strips, so byte
/// offsets match the wire layout the parsers expect.
fn manufacturer_payload(manufacturer_data: &HashMap<u16, Vec<u8>>) -> Vec<u8> {
    let mut payload = COMPANY_ID.to_le_bytes().to_vec();
    if let Some(body) = manufacturer_data.get(&COMPANY_ID) {
        payload.extend_from_slice(body);
    }
    payload
}

fn normalize_address(address: &str) -> String {
    address
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
