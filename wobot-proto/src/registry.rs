//! Capability registry: what each model supports over the command channel.

use crate::model::Model;

/// Command family a controllable model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFamily {
    Bot,
    Curtain,
    Humidifier,
    Plug,
    ColorBulb,
    StripLight,
    CeilingLight,
    Lock,
    LockPro,
    Relay,
}

impl CommandFamily {
    /// Families speaking through the AES-128-CTR overlay.
    pub fn requires_encryption(self) -> bool {
        matches!(
            self,
            CommandFamily::Lock | CommandFamily::LockPro | CommandFamily::Relay
        )
    }
}

/// What a model can do beyond connect/disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub model: Model,
    /// `None` for sensor-only models: they advertise but take no commands.
    pub family: Option<CommandFamily>,
}

impl Capabilities {
    /// Total map from model to capability set. Unknown models resolve to
    /// the minimal set (connect/disconnect only), never to an error.
    pub fn for_model(model: Model) -> Capabilities {
        let family = match model {
            Model::Bot => Some(CommandFamily::Bot),
            Model::Curtain | Model::Curtain3 => Some(CommandFamily::Curtain),
            Model::Humidifier | Model::Humidifier2 => Some(CommandFamily::Humidifier),
            Model::PlugMiniUs | Model::PlugMiniJp => Some(CommandFamily::Plug),
            Model::ColorBulb => Some(CommandFamily::ColorBulb),
            Model::StripLight => Some(CommandFamily::StripLight),
            Model::CeilingLight | Model::CeilingLightPro => Some(CommandFamily::CeilingLight),
            Model::Lock => Some(CommandFamily::Lock),
            Model::LockPro => Some(CommandFamily::LockPro),
            Model::RelaySwitch1 | Model::RelaySwitch1Pm => Some(CommandFamily::Relay),
            Model::Meter
            | Model::MeterPlus
            | Model::MeterPro
            | Model::MeterProCo2
            | Model::Hub2
            | Model::OutdoorMeter
            | Model::MotionSensor
            | Model::ContactSensor
            | Model::BlindTilt
            | Model::LeakDetector
            | Model::Keypad
            | Model::Unknown => None,
        };
        Capabilities { model, family }
    }

    pub fn requires_encryption(&self) -> bool {
        self.family.is_some_and(CommandFamily::requires_encryption)
    }
}
