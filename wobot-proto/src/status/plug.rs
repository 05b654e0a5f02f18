//! Plug Mini, US and JP variants.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7, u16_be};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlugMiniStatus {
    pub model: Model,
    pub state: bool,
    pub delay: bool,
    pub timer: bool,
    pub sync_utc_time: bool,
    pub wifi_rssi: u8,
    pub overload: bool,
    /// Watts, reported in tenths.
    pub current_power: f32,
}

pub fn parse(model: Model, manufacturer_data: &[u8]) -> Result<PlugMiniStatus, DecodeError> {
    if manufacturer_data.len() != 14 {
        return Err(DecodeError::ManufacturerDataLength {
            parser: model.name(),
            expected: 14,
            actual: manufacturer_data.len(),
        });
    }
    Ok(PlugMiniStatus {
        model,
        state: bit(manufacturer_data[9], 0x80),
        delay: bit(manufacturer_data[10], 0x01),
        timer: bit(manufacturer_data[10], 0x02),
        sync_utc_time: bit(manufacturer_data[10], 0x04),
        wifi_rssi: manufacturer_data[11],
        overload: bit(manufacturer_data[12], 0x80),
        current_power: u16_be(low7(manufacturer_data[12]), manufacturer_data[13]) as f32 / 10.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn powered_on_and_idle() {
        let frame = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0x80, 0, 0, 0, 0];
        let status = parse(Model::PlugMiniUs, &frame).unwrap();
        assert!(status.state);
        assert!(!status.delay);
        assert!(!status.timer);
        assert!(!status.sync_utc_time);
        assert_eq!(status.wifi_rssi, 0);
        assert!(!status.overload);
        assert_eq!(status.current_power, 0.0);
    }

    #[test]
    fn power_reading_masks_the_overload_bit() {
        let mut frame = [0u8; 14];
        frame[12] = 0x81;
        frame[13] = 0x2c;
        let status = parse(Model::PlugMiniJp, &frame).unwrap();
        assert_eq!(status.model, Model::PlugMiniJp);
        assert!(status.overload);
        assert_eq!(status.current_power, 30.0);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = parse(Model::PlugMiniUs, &[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ManufacturerDataLength {
                parser: "WoPlugMini",
                expected: 14,
                actual: 10,
            }
        );
    }
}
