//! Bot: the press-button actuator.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotStatus {
    pub model: Model,
    /// True in switch mode, false in press mode.
    pub mode: bool,
    /// Arm state; the reported bit is inverted on the wire.
    pub state: bool,
    pub battery: u8,
}

pub fn parse(service_data: &[u8]) -> Result<BotStatus, DecodeError> {
    if service_data.len() != 3 {
        return Err(DecodeError::ServiceDataLength {
            parser: Model::Bot.name(),
            expected: 3,
            actual: service_data.len(),
        });
    }
    Ok(BotStatus {
        model: Model::Bot,
        mode: bit(service_data[1], 0x80),
        state: !bit(service_data[1], 0x40),
        battery: low7(service_data[2]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_mode_on() {
        let status = parse(&[b'H', 0x80, 0x5f]).unwrap();
        assert!(status.mode);
        assert!(status.state);
        assert_eq!(status.battery, 95);
    }

    #[test]
    fn press_mode_reports_state_bit_inverted() {
        let status = parse(&[b'H', 0x40, 0x64]).unwrap();
        assert!(!status.mode);
        assert!(!status.state);
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(matches!(
            parse(&[b'H', 0x80]),
            Err(DecodeError::ServiceDataLength { expected: 3, actual: 2, .. })
        ));
    }
}
