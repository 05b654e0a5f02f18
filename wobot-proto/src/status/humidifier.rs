//! Humidifier, both generations; they advertise the same 8-byte layout.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumidifierStatus {
    pub model: Model,
    pub on_state: bool,
    pub auto_mode: bool,
    /// Target output, 0-100; zero while in auto mode. Values 101-103 on the
    /// wire are the quick gears.
    pub percentage: u8,
    /// Target humidity with the quick gears mapped to 33/66/100.
    pub humidity: u8,
}

pub fn parse(model: Model, service_data: &[u8]) -> Result<HumidifierStatus, DecodeError> {
    if service_data.len() != 8 {
        return Err(DecodeError::ServiceDataLength {
            parser: model.name(),
            expected: 8,
            actual: service_data.len(),
        });
    }
    let on_state = bit(service_data[1], 0x80);
    let auto_mode = bit(service_data[4], 0x80);
    let percentage = low7(service_data[4]);
    let humidity = if auto_mode {
        0
    } else {
        match percentage {
            101 => 33,
            102 => 66,
            103 => 100,
            level => level,
        }
    };
    Ok(HumidifierStatus {
        model,
        on_state,
        auto_mode,
        percentage: if auto_mode { 0 } else { percentage },
        humidity,
    })
}
