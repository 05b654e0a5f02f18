//! Advertisement decoding: one frame in, one typed record out.
//!
//! Dispatch reads the model discriminator at service-data byte 0 and hands
//! the frame to exactly one parser. Failures are reported to the caller's
//! diagnostic sink and returned; they are never fatal to a scan.

use crate::error::DecodeError;
use crate::model::Model;
use crate::status::{self, DeviceStatus};

/// One advertisement as captured by the central.
///
/// `manufacturer_data` includes the two company-id bytes, so byte offsets
/// match the wire layout the parsers are written against.
#[derive(Debug, Clone, Copy)]
pub struct Advertisement<'a> {
    pub service_data: &'a [u8],
    pub manufacturer_data: &'a [u8],
}

/// Receives non-fatal decode failures.
pub trait DiagnosticSink {
    fn decode_failure(&self, model: Model, error: &DecodeError);
}

/// Sink that drops everything.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn decode_failure(&self, _model: Model, _error: &DecodeError) {}
}

impl<F> DiagnosticSink for F
where
    F: Fn(Model, &DecodeError),
{
    fn decode_failure(&self, model: Model, error: &DecodeError) {
        self(model, error)
    }
}

/// Decodes one advertisement, routing by the discriminator at service-data
/// byte 0. Failures are reported to `sink` before being returned.
pub fn decode(
    frame: Advertisement<'_>,
    sink: &dyn DiagnosticSink,
) -> Result<DeviceStatus, DecodeError> {
    let model = frame
        .service_data
        .first()
        .map(|&byte| Model::from_discriminator(byte))
        .unwrap_or(Model::Unknown);
    decode_as(model, frame, sink)
}

/// Decodes one advertisement as the given model, bypassing discriminator
/// lookup. Scan filters use this: the keypad shares the leak detector's
/// `0x26` payload byte, so its parser is only reachable when the caller
/// names it.
pub fn decode_as(
    model: Model,
    frame: Advertisement<'_>,
    sink: &dyn DiagnosticSink,
) -> Result<DeviceStatus, DecodeError> {
    let result = dispatch(model, frame);
    if let Err(error) = &result {
        sink.decode_failure(model, error);
    }
    result
}

fn dispatch(model: Model, frame: Advertisement<'_>) -> Result<DeviceStatus, DecodeError> {
    let sd = frame.service_data;
    let mfr = frame.manufacturer_data;
    if sd.is_empty() {
        return Err(DecodeError::EmptyServiceData);
    }
    let record = match model {
        Model::Bot => DeviceStatus::Bot(status::bot::parse(sd)?),
        Model::Curtain => DeviceStatus::Curtain(status::curtain::parse(Model::Curtain, sd)?),
        Model::Curtain3 => DeviceStatus::Curtain(status::curtain::parse(Model::Curtain3, sd)?),
        Model::Humidifier => {
            DeviceStatus::Humidifier(status::humidifier::parse(Model::Humidifier, sd)?)
        }
        Model::Humidifier2 => {
            DeviceStatus::Humidifier(status::humidifier::parse(Model::Humidifier2, sd)?)
        }
        Model::Meter => DeviceStatus::Meter(status::meter::parse(Model::Meter, sd)?),
        Model::MeterPlus => DeviceStatus::Meter(status::meter::parse(Model::MeterPlus, sd)?),
        Model::MeterPro => DeviceStatus::Meter(status::meter::parse(Model::MeterPro, sd)?),
        Model::MeterProCo2 => DeviceStatus::MeterCo2(status::meter::parse_co2(sd, mfr)?),
        Model::Hub2 => DeviceStatus::Hub2(status::meter::parse_hub2(mfr)?),
        Model::OutdoorMeter => DeviceStatus::OutdoorMeter(status::meter::parse_outdoor(sd, mfr)?),
        Model::MotionSensor => DeviceStatus::MotionSensor(status::motion::parse(sd)?),
        Model::ContactSensor => DeviceStatus::ContactSensor(status::contact::parse(sd)?),
        Model::ColorBulb => DeviceStatus::Light(status::light::parse(Model::ColorBulb, mfr)?),
        Model::CeilingLight => {
            DeviceStatus::Light(status::light::parse(Model::CeilingLight, mfr)?)
        }
        Model::CeilingLightPro => {
            DeviceStatus::Light(status::light::parse(Model::CeilingLightPro, mfr)?)
        }
        Model::StripLight => DeviceStatus::StripLight(status::light::parse_strip(sd)?),
        Model::PlugMiniUs => DeviceStatus::PlugMini(status::plug::parse(Model::PlugMiniUs, mfr)?),
        Model::PlugMiniJp => DeviceStatus::PlugMini(status::plug::parse(Model::PlugMiniJp, mfr)?),
        Model::Lock => DeviceStatus::Lock(status::lock::parse(sd, mfr)?),
        Model::LockPro => DeviceStatus::Lock(status::lock::parse_pro(sd, mfr)?),
        Model::Keypad => DeviceStatus::Keypad(status::detector::parse_keypad(sd, mfr)?),
        Model::LeakDetector => DeviceStatus::Leak(status::detector::parse_leak(sd, mfr)?),
        Model::BlindTilt => DeviceStatus::BlindTilt(status::blind::parse(sd, mfr)?),
        Model::RelaySwitch1 => DeviceStatus::Relay(status::relay::parse(sd, mfr)?),
        Model::RelaySwitch1Pm => DeviceStatus::RelayPm(status::relay::parse_pm(sd, mfr)?),
        Model::Unknown => {
            return Err(DecodeError::UnknownModel {
                discriminator: sd[0],
            });
        }
    };
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn discriminator_selects_the_parser() {
        let frame = Advertisement {
            service_data: &[b'T', 0x02, 0x00, 0x04, 0x05, 0x06],
            manufacturer_data: &[],
        };
        let record = decode(frame, &NullSink).unwrap();
        assert_eq!(record.model(), Model::Meter);
        assert_eq!(record.model_name(), "WoSensorTH");
    }

    #[test]
    fn shared_detector_byte_routes_to_leak_by_default() {
        let frame = Advertisement {
            service_data: &[0x26, 0x03, 0x85],
            manufacturer_data: &[0x69, 0x09],
        };
        let record = decode(frame, &NullSink).unwrap();
        let DeviceStatus::Leak(leak) = record else {
            panic!("expected a leak record, got {record:?}");
        };
        assert!(leak.leak);
        assert!(leak.tampered);
        assert_eq!(leak.battery, 5);
        assert!(leak.low_battery);
    }

    #[test]
    fn keypad_is_reachable_by_explicit_routing() {
        let frame = Advertisement {
            service_data: &[0x26, 0x03, 0x85],
            manufacturer_data: &[0x69, 0x09],
        };
        let record = decode_as(Model::Keypad, frame, &NullSink).unwrap();
        let DeviceStatus::Keypad(keypad) = record else {
            panic!("expected a keypad record, got {record:?}");
        };
        assert!(keypad.event);
        assert!(keypad.tampered);
        assert_eq!(keypad.battery, 5);
        assert!(keypad.low_battery);
    }

    #[test]
    fn unknown_discriminator_is_nonfatal() {
        let frame = Advertisement {
            service_data: &[0x01, 0x02],
            manufacturer_data: &[],
        };
        assert_eq!(
            decode(frame, &NullSink).unwrap_err(),
            DecodeError::UnknownModel { discriminator: 0x01 }
        );
    }

    #[test]
    fn empty_service_data_is_rejected_before_dispatch() {
        let frame = Advertisement {
            service_data: &[],
            manufacturer_data: &[0x69, 0x09],
        };
        assert_eq!(
            decode(frame, &NullSink).unwrap_err(),
            DecodeError::EmptyServiceData
        );
    }

    #[test]
    fn failures_reach_the_sink() {
        let seen: RefCell<Vec<(Model, DecodeError)>> = RefCell::new(Vec::new());
        let sink = |model: Model, error: &DecodeError| {
            seen.borrow_mut().push((model, error.clone()));
        };
        let frame = Advertisement {
            service_data: &[b'T', 0x02, 0x00],
            manufacturer_data: &[],
        };
        assert!(decode(frame, &sink).is_err());
        let seen = seen.into_inner();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Model::Meter);
        assert_eq!(seen[0].1.parser(), Some("WoSensorTH"));
    }
}
