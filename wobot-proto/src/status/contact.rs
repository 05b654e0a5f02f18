//! Contact (door) sensor.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7};
use crate::model::Model;

/// Two-bit hall-sensor state with a closed fallback arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DoorState {
    Closed,
    Open,
    TimeoutNotClosed,
    Unknown,
}

impl DoorState {
    pub fn from_bits(code: u8) -> DoorState {
        match code & 0x03 {
            0 => DoorState::Closed,
            1 => DoorState::Open,
            2 => DoorState::TimeoutNotClosed,
            _ => DoorState::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSensorStatus {
    pub model: Model,
    pub tested: bool,
    pub movement: bool,
    pub battery: u8,
    pub contact_open: bool,
    pub contact_timeout: bool,
    pub is_light: bool,
    pub door_state: DoorState,
    /// Press counter on the sensor button, 0-15.
    pub button_count: u8,
}

pub fn parse(service_data: &[u8]) -> Result<ContactSensorStatus, DecodeError> {
    if service_data.len() != 9 {
        return Err(DecodeError::ServiceDataLength {
            parser: Model::ContactSensor.name(),
            expected: 9,
            actual: service_data.len(),
        });
    }
    Ok(ContactSensorStatus {
        model: Model::ContactSensor,
        tested: bit(service_data[1], 0x80),
        movement: bit(service_data[1], 0x40),
        battery: low7(service_data[2]),
        contact_open: bit(service_data[3], 0x02),
        contact_timeout: bit(service_data[3], 0x04),
        is_light: bit(service_data[3], 0x01),
        door_state: DoorState::from_bits(service_data[3] >> 1),
        button_count: service_data[8] & 0x0f,
    })
}
