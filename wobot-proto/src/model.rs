//! Model registry: every product family this stack understands, keyed by
//! the one-byte discriminator at service-data byte 0.

use serde::Serialize;

/// Closed set of known models plus `Unknown` for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Model {
    Bot,
    Curtain,
    Curtain3,
    Humidifier,
    Humidifier2,
    Meter,
    MeterPlus,
    MeterPro,
    MeterProCo2,
    Hub2,
    OutdoorMeter,
    MotionSensor,
    ContactSensor,
    ColorBulb,
    StripLight,
    PlugMiniUs,
    PlugMiniJp,
    Lock,
    LockPro,
    CeilingLight,
    CeilingLightPro,
    BlindTilt,
    LeakDetector,
    Keypad,
    RelaySwitch1,
    RelaySwitch1Pm,
    Unknown,
}

impl Model {
    /// Maps a discriminator byte to its model. Unrecognized bytes map to
    /// `Unknown`; they are still resolvable to a minimal capability set.
    pub fn from_discriminator(byte: u8) -> Model {
        match byte {
            b'H' => Model::Bot,
            b'c' => Model::Curtain,
            b'{' => Model::Curtain3,
            b'e' => Model::Humidifier,
            b'E' => Model::Humidifier2,
            b'T' => Model::Meter,
            b'i' => Model::MeterPlus,
            b'4' => Model::MeterPro,
            b'5' => Model::MeterProCo2,
            b'v' => Model::Hub2,
            b'w' => Model::OutdoorMeter,
            b's' => Model::MotionSensor,
            b'd' => Model::ContactSensor,
            b'u' => Model::ColorBulb,
            b'r' => Model::StripLight,
            b'g' => Model::PlugMiniUs,
            b'j' => Model::PlugMiniJp,
            b'o' => Model::Lock,
            b'$' => Model::LockPro,
            b'q' => Model::CeilingLight,
            b'n' => Model::CeilingLightPro,
            b'x' => Model::BlindTilt,
            b'&' => Model::LeakDetector,
            b'y' => Model::Keypad,
            b';' => Model::RelaySwitch1,
            b'<' => Model::RelaySwitch1Pm,
            _ => Model::Unknown,
        }
    }

    /// Discriminator byte as it appears on the wire; `None` for `Unknown`.
    pub fn discriminator(self) -> Option<u8> {
        match self {
            Model::Bot => Some(b'H'),
            Model::Curtain => Some(b'c'),
            Model::Curtain3 => Some(b'{'),
            Model::Humidifier => Some(b'e'),
            Model::Humidifier2 => Some(b'E'),
            Model::Meter => Some(b'T'),
            Model::MeterPlus => Some(b'i'),
            Model::MeterPro => Some(b'4'),
            Model::MeterProCo2 => Some(b'5'),
            Model::Hub2 => Some(b'v'),
            Model::OutdoorMeter => Some(b'w'),
            Model::MotionSensor => Some(b's'),
            Model::ContactSensor => Some(b'd'),
            Model::ColorBulb => Some(b'u'),
            Model::StripLight => Some(b'r'),
            Model::PlugMiniUs => Some(b'g'),
            Model::PlugMiniJp => Some(b'j'),
            Model::Lock => Some(b'o'),
            Model::LockPro => Some(b'$'),
            Model::CeilingLight => Some(b'q'),
            Model::CeilingLightPro => Some(b'n'),
            Model::BlindTilt => Some(b'x'),
            Model::LeakDetector => Some(b'&'),
            Model::Keypad => Some(b'y'),
            Model::RelaySwitch1 => Some(b';'),
            Model::RelaySwitch1Pm => Some(b'<'),
            Model::Unknown => None,
        }
    }

    /// Protocol-level model name (the `Wo*` family names).
    pub fn name(self) -> &'static str {
        match self {
            Model::Bot => "WoHand",
            Model::Curtain => "WoCurtain",
            Model::Curtain3 => "WoCurtain3",
            Model::Humidifier => "WoHumi",
            Model::Humidifier2 => "WoHumi2",
            Model::Meter => "WoSensorTH",
            Model::MeterPlus => "WoSensorTHPlus",
            Model::MeterPro => "WoSensorTHP",
            Model::MeterProCo2 => "WoSensorTHPc",
            Model::Hub2 => "WoHub2",
            Model::OutdoorMeter => "WoIOSensorTH",
            Model::MotionSensor => "WoMotion",
            Model::ContactSensor => "WoContact",
            Model::ColorBulb => "WoBulb",
            Model::StripLight => "WoStrip",
            Model::PlugMiniUs | Model::PlugMiniJp => "WoPlugMini",
            Model::Lock => "WoSmartLock",
            Model::LockPro => "WoSmartLockPro",
            Model::CeilingLight => "WoCeilingLight",
            Model::CeilingLightPro => "WoCeilingLightPro",
            Model::BlindTilt => "WoBlindTilt",
            Model::LeakDetector => "WoLeakDetector",
            Model::Keypad => "WoKeypad",
            Model::RelaySwitch1 => "WoRelaySwitch1Plus",
            Model::RelaySwitch1Pm => "WoRelaySwitch1PM",
            Model::Unknown => "Unknown",
        }
    }

    /// Human-readable product name.
    pub fn display_name(self) -> &'static str {
        match self {
            Model::Bot => "Bot",
            Model::Curtain => "Curtain",
            Model::Curtain3 => "Curtain 3",
            Model::Humidifier => "Humidifier",
            Model::Humidifier2 => "Humidifier2",
            Model::Meter => "Meter",
            Model::MeterPlus => "Meter Plus",
            Model::MeterPro => "Meter Pro",
            Model::MeterProCo2 => "Meter Pro CO2",
            Model::Hub2 => "Hub 2",
            Model::OutdoorMeter => "Outdoor Meter",
            Model::MotionSensor => "Motion Sensor",
            Model::ContactSensor => "Contact Sensor",
            Model::ColorBulb => "Color Bulb",
            Model::StripLight => "Strip Light",
            Model::PlugMiniUs | Model::PlugMiniJp => "Plug Mini",
            Model::Lock => "Lock",
            Model::LockPro => "Lock Pro",
            Model::CeilingLight => "Ceiling Light",
            Model::CeilingLightPro => "Ceiling Light Pro",
            Model::BlindTilt => "Blind Tilt",
            Model::LeakDetector => "Water Detector",
            Model::Keypad => "Keypad",
            Model::RelaySwitch1 => "Relay Switch 1",
            Model::RelaySwitch1Pm => "Relay Switch 1PM",
            Model::Unknown => "Unknown",
        }
    }
}
