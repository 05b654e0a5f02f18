//! Curtain and Curtain 3 share one service-data layout.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7, percent};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurtainStatus {
    pub model: Model,
    pub calibration: bool,
    pub battery: u8,
    pub in_motion: bool,
    /// 0 fully open, 100 fully closed.
    pub position: u8,
    /// Ambient light step, 0-15.
    pub light_level: u8,
    /// Position in a chained pair, 0-7.
    pub device_chain: u8,
}

pub fn parse(model: Model, service_data: &[u8]) -> Result<CurtainStatus, DecodeError> {
    if service_data.len() < 5 {
        return Err(DecodeError::ServiceDataTooShort {
            parser: model.name(),
            needed: 5,
            actual: service_data.len(),
        });
    }
    Ok(CurtainStatus {
        model,
        calibration: bit(service_data[1], 0x40),
        battery: low7(service_data[2]),
        in_motion: bit(service_data[3], 0x80),
        position: percent(service_data[3]),
        light_level: (service_data[4] >> 4) & 0x0f,
        device_chain: service_data[4] & 0x07,
    })
}
