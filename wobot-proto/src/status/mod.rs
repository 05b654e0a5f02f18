//! Typed state records decoded from advertisements, one module per product
//! family. Parsers are pure byte-to-record transforms; every byte read is
//! covered by a length check up front.

pub mod blind;
pub mod bot;
pub mod contact;
pub mod curtain;
pub mod detector;
pub mod humidifier;
pub mod light;
pub mod lock;
pub mod meter;
pub mod motion;
pub mod plug;
pub mod relay;

pub use blind::BlindTiltStatus;
pub use bot::BotStatus;
pub use contact::{ContactSensorStatus, DoorState};
pub use curtain::CurtainStatus;
pub use detector::{KeypadStatus, LeakStatus};
pub use humidifier::HumidifierStatus;
pub use light::{LightStatus, StripLightStatus};
pub use lock::{LockAdvertisement, LockState};
pub use meter::{Hub2Status, MeterCo2Status, MeterStatus, OutdoorMeterStatus};
pub use motion::MotionSensorStatus;
pub use plug::PlugMiniStatus;
pub use relay::{RelayPmStatus, RelayStatus};

use serde::Serialize;

use crate::model::Model;

/// Every record this stack can decode, tagged by family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeviceStatus {
    Bot(BotStatus),
    Curtain(CurtainStatus),
    Humidifier(HumidifierStatus),
    Meter(MeterStatus),
    MeterCo2(MeterCo2Status),
    OutdoorMeter(OutdoorMeterStatus),
    Hub2(Hub2Status),
    MotionSensor(MotionSensorStatus),
    ContactSensor(ContactSensorStatus),
    Light(LightStatus),
    StripLight(StripLightStatus),
    PlugMini(PlugMiniStatus),
    Lock(LockAdvertisement),
    Keypad(KeypadStatus),
    Leak(LeakStatus),
    BlindTilt(BlindTiltStatus),
    Relay(RelayStatus),
    RelayPm(RelayPmStatus),
}

impl DeviceStatus {
    /// Model the record was decoded for.
    pub fn model(&self) -> Model {
        match self {
            DeviceStatus::Bot(s) => s.model,
            DeviceStatus::Curtain(s) => s.model,
            DeviceStatus::Humidifier(s) => s.model,
            DeviceStatus::Meter(s) => s.model,
            DeviceStatus::MeterCo2(s) => s.model,
            DeviceStatus::OutdoorMeter(s) => s.model,
            DeviceStatus::Hub2(s) => s.model,
            DeviceStatus::MotionSensor(s) => s.model,
            DeviceStatus::ContactSensor(s) => s.model,
            DeviceStatus::Light(s) => s.model,
            DeviceStatus::StripLight(s) => s.model,
            DeviceStatus::PlugMini(s) => s.model,
            DeviceStatus::Lock(s) => s.model,
            DeviceStatus::Keypad(s) => s.model,
            DeviceStatus::Leak(s) => s.model,
            DeviceStatus::BlindTilt(s) => s.model,
            DeviceStatus::Relay(s) => s.model,
            DeviceStatus::RelayPm(s) => s.model,
        }
    }

    /// Protocol-level model name (`WoHand`, `WoCurtain`, ...).
    pub fn model_name(&self) -> &'static str {
        self.model().name()
    }

    /// Human-readable product name.
    pub fn display_name(&self) -> &'static str {
        self.model().display_name()
    }
}
