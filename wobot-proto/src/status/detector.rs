//! Keypad and water-leak detector. Both tag their service data with model
//! id 0x26 and share the event/battery layout.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7};
use crate::model::Model;

/// Fixed model id both detectors stamp at service-data byte 0.
pub const DETECTOR_MODEL_ID: u8 = 0x26;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeypadStatus {
    pub model: Model,
    pub event: bool,
    pub tampered: bool,
    pub battery: u8,
    pub low_battery: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeakStatus {
    pub model: Model,
    pub leak: bool,
    pub tampered: bool,
    pub battery: u8,
    pub low_battery: bool,
}

struct RawDetector {
    event: bool,
    tampered: bool,
    battery: u8,
    low_battery: bool,
}

fn parse_raw(
    parser: &'static str,
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<RawDetector, DecodeError> {
    if service_data.len() < 3 {
        return Err(DecodeError::ServiceDataTooShort {
            parser,
            needed: 3,
            actual: service_data.len(),
        });
    }
    if manufacturer_data.len() < 2 {
        return Err(DecodeError::ManufacturerDataTooShort {
            parser,
            needed: 2,
            actual: manufacturer_data.len(),
        });
    }
    if service_data[0] != DETECTOR_MODEL_ID {
        return Err(DecodeError::ModelIdMismatch {
            parser,
            expected: DETECTOR_MODEL_ID,
            found: service_data[0],
        });
    }
    Ok(RawDetector {
        event: bit(service_data[1], 0x01),
        tampered: bit(service_data[1], 0x02),
        battery: low7(service_data[2]),
        low_battery: bit(service_data[2], 0x80),
    })
}

pub fn parse_keypad(
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<KeypadStatus, DecodeError> {
    let raw = parse_raw(Model::Keypad.name(), service_data, manufacturer_data)?;
    Ok(KeypadStatus {
        model: Model::Keypad,
        event: raw.event,
        tampered: raw.tampered,
        battery: raw.battery,
        low_battery: raw.low_battery,
    })
}

pub fn parse_leak(
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<LeakStatus, DecodeError> {
    let raw = parse_raw(Model::LeakDetector.name(), service_data, manufacturer_data)?;
    Ok(LeakStatus {
        model: Model::LeakDetector,
        leak: raw.event,
        tampered: raw.tampered,
        battery: raw.battery,
        low_battery: raw.low_battery,
    })
}
