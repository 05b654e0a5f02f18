//! Temperature/humidity sensors: the meter family, the outdoor meter, the
//! CO2 variant, and the Hub 2 environment block.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, fahrenheit, low7, temperature_c, u16_be};
use crate::model::Model;

/// Meter, Meter Plus, and Meter Pro share one 6-byte service-data layout.
pub const SERVICE_DATA_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterStatus {
    pub model: Model,
    pub celsius: f32,
    pub fahrenheit: f32,
    /// Display unit configured on the device, not the unit of the reading.
    pub fahrenheit_mode: bool,
    pub humidity: u8,
    pub battery: u8,
}

/// Shared parse for `Meter`, `MeterPlus`, and `MeterPro`.
pub fn parse(model: Model, service_data: &[u8]) -> Result<MeterStatus, DecodeError> {
    if service_data.len() != SERVICE_DATA_LEN {
        return Err(DecodeError::ServiceDataLength {
            parser: model.name(),
            expected: SERVICE_DATA_LEN,
            actual: service_data.len(),
        });
    }
    let celsius = temperature_c(service_data[3], service_data[4]);
    Ok(MeterStatus {
        model,
        celsius,
        fahrenheit: fahrenheit(celsius),
        fahrenheit_mode: bit(service_data[5], 0x80),
        humidity: low7(service_data[5]),
        battery: low7(service_data[1]),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterCo2Status {
    pub model: Model,
    pub celsius: f32,
    pub fahrenheit: f32,
    pub fahrenheit_mode: bool,
    pub humidity: u8,
    pub battery: u8,
    /// Parts per million.
    pub co2: u16,
}

/// Meter Pro CO2: the meter layout plus a CO2 reading in manufacturer data.
pub fn parse_co2(
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<MeterCo2Status, DecodeError> {
    let base = parse(Model::MeterProCo2, service_data)?;
    if manufacturer_data.len() < 16 {
        return Err(DecodeError::ManufacturerDataTooShort {
            parser: Model::MeterProCo2.name(),
            needed: 16,
            actual: manufacturer_data.len(),
        });
    }
    Ok(MeterCo2Status {
        model: base.model,
        celsius: base.celsius,
        fahrenheit: base.fahrenheit,
        fahrenheit_mode: base.fahrenheit_mode,
        humidity: base.humidity,
        battery: base.battery,
        co2: u16_be(manufacturer_data[13], manufacturer_data[14]),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutdoorMeterStatus {
    pub model: Model,
    pub celsius: f32,
    pub fahrenheit: f32,
    pub fahrenheit_mode: bool,
    pub humidity: u8,
    pub battery: u8,
}

/// Outdoor meter: battery in service data, readings in manufacturer data.
pub fn parse_outdoor(
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<OutdoorMeterStatus, DecodeError> {
    if service_data.len() < 3 {
        return Err(DecodeError::ServiceDataTooShort {
            parser: Model::OutdoorMeter.name(),
            needed: 3,
            actual: service_data.len(),
        });
    }
    if manufacturer_data.len() < 14 {
        return Err(DecodeError::ManufacturerDataTooShort {
            parser: Model::OutdoorMeter.name(),
            needed: 14,
            actual: manufacturer_data.len(),
        });
    }
    let celsius = temperature_c(manufacturer_data[10], manufacturer_data[11]);
    Ok(OutdoorMeterStatus {
        model: Model::OutdoorMeter,
        celsius,
        fahrenheit: fahrenheit(celsius),
        fahrenheit_mode: bit(manufacturer_data[12], 0x80),
        humidity: low7(manufacturer_data[12]),
        battery: low7(service_data[2]),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hub2Status {
    pub model: Model,
    pub celsius: f32,
    pub fahrenheit: f32,
    pub fahrenheit_mode: bool,
    pub humidity: u8,
    /// Ambient light step, 1-20.
    pub light_level: u8,
}

/// Hub 2 carries its environment block in manufacturer data only.
pub fn parse_hub2(manufacturer_data: &[u8]) -> Result<Hub2Status, DecodeError> {
    if manufacturer_data.len() < 18 {
        return Err(DecodeError::ManufacturerDataTooShort {
            parser: Model::Hub2.name(),
            needed: 18,
            actual: manufacturer_data.len(),
        });
    }
    let celsius = temperature_c(manufacturer_data[13], manufacturer_data[14]);
    Ok(Hub2Status {
        model: Model::Hub2,
        celsius,
        fahrenheit: fahrenheit(celsius),
        fahrenheit_mode: bit(manufacturer_data[15], 0x80),
        humidity: low7(manufacturer_data[15]),
        light_level: manufacturer_data[12] & 0x1f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_reference_reading() {
        let status = parse(Model::Meter, &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]).unwrap();
        assert_eq!(status.celsius, -0.4);
        assert_eq!(status.fahrenheit, 31.3);
        assert_eq!(status.humidity, 6);
        assert_eq!(status.battery, 2);
        assert!(!status.fahrenheit_mode);
    }

    #[test]
    fn meter_positive_reading_with_fahrenheit_display() {
        let status = parse(Model::MeterPlus, &[0x00, 0x64, 0x00, 0x08, 0xa2, 0xb7]).unwrap();
        assert_eq!(status.model, Model::MeterPlus);
        assert_eq!(status.celsius, 2.8);
        assert_eq!(status.humidity, 55);
        assert_eq!(status.battery, 100);
        assert!(status.fahrenheit_mode);
    }

    #[test]
    fn meter_rejects_wrong_length() {
        let err = parse(Model::Meter, &[0x01, 0x02, 0x03]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ServiceDataLength {
                parser: "WoSensorTH",
                expected: 6,
                actual: 3,
            }
        );
    }

    #[test]
    fn co2_reading_is_big_endian() {
        let mut manufacturer = [0u8; 16];
        manufacturer[13] = 0x02;
        manufacturer[14] = 0x58;
        let status = parse_co2(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06], &manufacturer).unwrap();
        assert_eq!(status.co2, 600);
        assert_eq!(status.celsius, -0.4);
    }

    #[test]
    fn co2_requires_manufacturer_block() {
        let err = parse_co2(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06], &[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ManufacturerDataTooShort {
                needed: 16,
                actual: 10,
                ..
            }
        ));
    }

    #[test]
    fn outdoor_meter_reads_from_manufacturer_data() {
        let mut manufacturer = [0u8; 14];
        manufacturer[10] = 0x05;
        manufacturer[11] = 0xb0;
        manufacturer[12] = 0x28;
        let status = parse_outdoor(&[0x77, 0x00, 0x5a], &manufacturer).unwrap();
        assert_eq!(status.celsius, 3.5);
        assert_eq!(status.humidity, 40);
        assert_eq!(status.battery, 90);
    }

    #[test]
    fn outdoor_meter_checks_both_buffers() {
        assert!(matches!(
            parse_outdoor(&[0x77, 0x00], &[0u8; 14]),
            Err(DecodeError::ServiceDataTooShort { needed: 3, actual: 2, .. })
        ));
        assert!(matches!(
            parse_outdoor(&[0x77, 0x00, 0x5a], &[0u8; 13]),
            Err(DecodeError::ManufacturerDataTooShort { needed: 14, actual: 13, .. })
        ));
    }

    #[test]
    fn hub2_requires_eighteen_manufacturer_bytes() {
        assert!(matches!(
            parse_hub2(&[0u8; 17]),
            Err(DecodeError::ManufacturerDataTooShort { needed: 18, actual: 17, .. })
        ));
    }

    #[test]
    fn hub2_environment_block() {
        let mut manufacturer = [0u8; 18];
        manufacturer[12] = 0x0f;
        manufacturer[13] = 0x02;
        manufacturer[14] = 0x96;
        manufacturer[15] = 0x32;
        let status = parse_hub2(&manufacturer).unwrap();
        assert_eq!(status.celsius, 1.2);
        assert_eq!(status.humidity, 50);
        assert_eq!(status.light_level, 15);
        assert!(!status.fahrenheit_mode);
    }
}
