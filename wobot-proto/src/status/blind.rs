//! Blind tilt.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7, percent};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlindTiltStatus {
    pub model: Model,
    pub calibration: bool,
    pub battery: u8,
    pub in_motion: bool,
    /// Slat angle mapped onto 0-100.
    pub tilt: u8,
    /// Ambient light step, 0-15.
    pub light_level: u8,
}

pub fn parse(
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<BlindTiltStatus, DecodeError> {
    if service_data.len() < 3 {
        return Err(DecodeError::ServiceDataTooShort {
            parser: Model::BlindTilt.name(),
            needed: 3,
            actual: service_data.len(),
        });
    }
    if manufacturer_data.len() < 9 {
        return Err(DecodeError::ManufacturerDataTooShort {
            parser: Model::BlindTilt.name(),
            needed: 9,
            actual: manufacturer_data.len(),
        });
    }
    Ok(BlindTiltStatus {
        model: Model::BlindTilt,
        calibration: bit(manufacturer_data[6], 0x80),
        battery: low7(service_data[2]),
        in_motion: bit(manufacturer_data[6], 0x01),
        tilt: percent(manufacturer_data[7]),
        light_level: (manufacturer_data[8] >> 4) & 0x0f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilted_and_calibrated() {
        let service = [b'x', 0x00, 0x58];
        let mut manufacturer = [0u8; 9];
        manufacturer[6] = 0x81;
        manufacturer[7] = 0x2d;
        manufacturer[8] = 0x70;
        let status = parse(&service, &manufacturer).unwrap();
        assert!(status.calibration);
        assert!(status.in_motion);
        assert_eq!(status.battery, 88);
        assert_eq!(status.tilt, 45);
        assert_eq!(status.light_level, 7);
    }

    #[test]
    fn tilt_clamps_to_100() {
        let mut manufacturer = [0u8; 9];
        manufacturer[7] = 0x7f;
        let status = parse(&[b'x', 0, 0], &manufacturer).unwrap();
        assert_eq!(status.tilt, 100);
    }

    #[test]
    fn needs_nine_manufacturer_bytes() {
        assert!(matches!(
            parse(&[b'x', 0, 0], &[0u8; 8]),
            Err(DecodeError::ManufacturerDataTooShort { needed: 9, actual: 8, .. })
        ));
    }
}
