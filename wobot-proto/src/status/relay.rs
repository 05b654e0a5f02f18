//! Relay Switch 1 and the power-metering 1PM variant.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, deciwatt};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayStatus {
    pub model: Model,
    /// Always true on current firmware; kept for wire compatibility.
    pub mode: bool,
    pub state: bool,
    pub sequence_number: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayPmStatus {
    pub model: Model,
    pub mode: bool,
    pub state: bool,
    pub sequence_number: u8,
    /// Watts, reported in tenths.
    pub power: f32,
    /// Populated from the voltage/current exchange, zero in advertisements.
    pub voltage: u16,
    pub current: u16,
}

fn check_lengths(
    parser: &'static str,
    service_data: &[u8],
    manufacturer_data: &[u8],
    manufacturer_needed: usize,
) -> Result<(), DecodeError> {
    if service_data.len() < 8 {
        return Err(DecodeError::ServiceDataTooShort {
            parser,
            needed: 8,
            actual: service_data.len(),
        });
    }
    if manufacturer_data.len() < manufacturer_needed {
        return Err(DecodeError::ManufacturerDataTooShort {
            parser,
            needed: manufacturer_needed,
            actual: manufacturer_data.len(),
        });
    }
    Ok(())
}

pub fn parse(service_data: &[u8], manufacturer_data: &[u8]) -> Result<RelayStatus, DecodeError> {
    check_lengths(Model::RelaySwitch1.name(), service_data, manufacturer_data, 8)?;
    Ok(RelayStatus {
        model: Model::RelaySwitch1,
        mode: true,
        state: bit(manufacturer_data[7], 0x80),
        sequence_number: manufacturer_data[6],
    })
}

pub fn parse_pm(
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<RelayPmStatus, DecodeError> {
    check_lengths(Model::RelaySwitch1Pm.name(), service_data, manufacturer_data, 12)?;
    Ok(RelayPmStatus {
        model: Model::RelaySwitch1Pm,
        mode: true,
        state: bit(manufacturer_data[7], 0x80),
        sequence_number: manufacturer_data[6],
        power: deciwatt(manufacturer_data[10], manufacturer_data[11]),
        voltage: 0,
        current: 0,
    })
}
