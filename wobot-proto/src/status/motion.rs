//! Motion sensor.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionSensorStatus {
    pub model: Model,
    pub tested: bool,
    pub movement: bool,
    pub battery: u8,
    pub led: bool,
    pub iot: bool,
    /// Detection range step, 0-3.
    pub sense_distance: u8,
    /// Raw 2-bit ambient code (1 dark, 2 bright).
    pub light_level: u8,
    pub is_light: bool,
}

pub fn parse(service_data: &[u8]) -> Result<MotionSensorStatus, DecodeError> {
    if service_data.len() != 6 {
        return Err(DecodeError::ServiceDataLength {
            parser: Model::MotionSensor.name(),
            expected: 6,
            actual: service_data.len(),
        });
    }
    Ok(MotionSensorStatus {
        model: Model::MotionSensor,
        tested: bit(service_data[1], 0x80),
        movement: bit(service_data[1], 0x40),
        battery: low7(service_data[2]),
        led: bit(service_data[5], 0x20),
        iot: bit(service_data[5], 0x10),
        sense_distance: (service_data[5] & 0x0c) >> 2,
        light_level: service_data[5] & 0x03,
        is_light: bit(service_data[5], 0x02),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_in_bright_light() {
        let status = parse(&[b's', 0x40, 0x62, 0x00, 0x00, 0x2e]).unwrap();
        assert!(status.movement);
        assert!(!status.tested);
        assert_eq!(status.battery, 98);
        assert!(status.led);
        assert_eq!(status.sense_distance, 3);
        assert_eq!(status.light_level, 2);
        assert!(status.is_light);
    }

    #[test]
    fn still_and_dark() {
        let status = parse(&[b's', 0x00, 0x3c, 0x00, 0x00, 0x01]).unwrap();
        assert!(!status.movement);
        assert_eq!(status.light_level, 1);
        assert!(!status.is_light);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            parse(&[b's', 0x40]),
            Err(DecodeError::ServiceDataLength { expected: 6, actual: 2, .. })
        ));
    }
}
