//! RGB lights: color bulb, ceiling lights, and the LED strip.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7};
use crate::model::Model;

/// Color bulb and both ceiling lights advertise one 13-byte manufacturer
/// layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightStatus {
    pub model: Model,
    pub power: u8,
    pub state: bool,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub color_temperature: u8,
    pub brightness: u8,
    pub delay: bool,
    pub preset: bool,
    /// Active color program, 0-7.
    pub color_mode: u8,
    pub speed: u8,
    pub loop_index: u8,
}

pub fn parse(model: Model, manufacturer_data: &[u8]) -> Result<LightStatus, DecodeError> {
    if manufacturer_data.len() != 13 {
        return Err(DecodeError::ManufacturerDataLength {
            parser: model.name(),
            expected: 13,
            actual: manufacturer_data.len(),
        });
    }
    Ok(LightStatus {
        model,
        power: manufacturer_data[1],
        state: bit(manufacturer_data[7], 0x80),
        red: manufacturer_data[3],
        green: manufacturer_data[4],
        blue: manufacturer_data[5],
        color_temperature: manufacturer_data[6],
        brightness: low7(manufacturer_data[7]),
        delay: bit(manufacturer_data[8], 0x80),
        preset: bit(manufacturer_data[8], 0x08),
        color_mode: manufacturer_data[8] & 0x07,
        speed: low7(manufacturer_data[9]),
        loop_index: manufacturer_data[10] & 0xfe,
    })
}

/// The LED strip advertises through service data instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripLightStatus {
    pub model: Model,
    pub state: bool,
    pub brightness: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub delay: bool,
    pub preset: bool,
    pub color_mode: u8,
    pub speed: u8,
    pub loop_index: u8,
}

pub fn parse_strip(service_data: &[u8]) -> Result<StripLightStatus, DecodeError> {
    if service_data.len() < 18 {
        return Err(DecodeError::ServiceDataTooShort {
            parser: Model::StripLight.name(),
            needed: 18,
            actual: service_data.len(),
        });
    }
    Ok(StripLightStatus {
        model: Model::StripLight,
        state: bit(service_data[7], 0x80),
        brightness: low7(service_data[7]),
        red: service_data[3],
        green: service_data[4],
        blue: service_data[5],
        delay: bit(service_data[8], 0x80),
        preset: bit(service_data[8], 0x08),
        color_mode: service_data[8] & 0x07,
        speed: low7(service_data[9]),
        loop_index: service_data[10] & 0xfe,
    })
}
