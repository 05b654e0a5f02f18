//! Command frames and response conventions, one module per device family.
//!
//! Frames are byte-exact: the firmware matches them bit for bit. Builders
//! validate or clamp their arguments before producing a frame, so a bad
//! argument never reaches the transport.

use crate::ble::commands::{EXTENDED, HEAD, PLAIN};
use crate::error::CommandError;

/// How many bytes a response must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    Exact(usize),
    AtLeast(usize),
}

/// What a valid response to one command family looks like.
#[derive(Debug, Clone, Copy)]
pub struct ResponseSpec {
    pub length: LengthRule,
    pub status_index: usize,
    pub accepted: &'static [u8],
}

impl ResponseSpec {
    pub const fn exact(len: usize, status_index: usize, accepted: &'static [u8]) -> Self {
        ResponseSpec {
            length: LengthRule::Exact(len),
            status_index,
            accepted,
        }
    }

    pub const fn at_least(len: usize, status_index: usize, accepted: &'static [u8]) -> Self {
        ResponseSpec {
            length: LengthRule::AtLeast(len),
            status_index,
            accepted,
        }
    }

    pub fn length_ok(&self, response: &[u8]) -> bool {
        match self.length {
            LengthRule::Exact(len) => response.len() == len,
            LengthRule::AtLeast(len) => response.len() >= len,
        }
    }

    pub fn status_ok(&self, response: &[u8]) -> bool {
        response
            .get(self.status_index)
            .is_some_and(|status| self.accepted.contains(status))
    }
}

/// Requests the per-session initialization vector for `key_id`. Always sent
/// on the unencrypted path; the IV is the response tail after its 4-byte
/// header.
pub fn get_ck_iv(key_id: u8) -> [u8; 5] {
    [HEAD, EXTENDED, 0x21, 0x03, key_id]
}

pub mod bot {
    use super::*;

    pub const PRESS: [u8; 3] = [HEAD, 0x01, 0x00];
    pub const TURN_ON: [u8; 3] = [HEAD, 0x01, 0x01];
    pub const TURN_OFF: [u8; 3] = [HEAD, 0x01, 0x02];
    pub const DOWN: [u8; 3] = [HEAD, 0x01, 0x03];
    pub const UP: [u8; 3] = [HEAD, 0x01, 0x04];

    pub const RESPONSE: ResponseSpec = ResponseSpec::exact(3, 0, &[0x01, 0x05]);
}

pub mod curtain {
    use super::*;

    /// Drive at the default speed setting.
    pub const DEFAULT_MODE: u8 = 0xff;

    pub const PAUSE: [u8; 6] = [HEAD, EXTENDED, 0x45, 0x01, 0x00, 0xff];

    /// Runs to an absolute position, 0 fully open to 100 fully closed.
    /// Out-of-range positions are clamped.
    pub fn run_to(position: u8, mode: u8) -> [u8; 7] {
        [HEAD, EXTENDED, 0x45, 0x01, 0x05, mode, position.min(100)]
    }

    pub fn open() -> [u8; 7] {
        run_to(0, DEFAULT_MODE)
    }

    pub fn close() -> [u8; 7] {
        run_to(100, DEFAULT_MODE)
    }

    pub const RESPONSE: ResponseSpec = ResponseSpec::exact(3, 0, &[0x01, 0x05]);
}

pub mod humidifier {
    use super::*;

    pub const TURN_ON: [u8; 4] = [HEAD, 0x01, 0x01, 0x01];
    pub const TURN_OFF: [u8; 4] = [HEAD, 0x01, 0x01, 0x02];
    pub const INCREASE: [u8; 4] = [HEAD, 0x01, 0x01, 0x03];
    pub const DECREASE: [u8; 4] = [HEAD, 0x01, 0x01, 0x04];
    pub const AUTO_MODE: [u8; 4] = [HEAD, 0x01, 0x01, 0x05];
    pub const MANUAL_MODE: [u8; 4] = [HEAD, 0x01, 0x01, 0x06];

    /// Sets the target mist level. Levels above 100 are rejected, not
    /// clamped, so a typo cannot soak the room.
    pub fn set_percentage(level: u8) -> Result<[u8; 5], CommandError> {
        if level > 100 {
            return Err(CommandError::LevelOutOfRange { level });
        }
        Ok([HEAD, 0x01, 0x01, 0x07, level])
    }

    pub const RESPONSE: ResponseSpec = ResponseSpec::exact(3, 0, &[0x01, 0x05]);
}

pub mod plug {
    use super::*;

    pub const TURN_ON: [u8; 6] = [HEAD, EXTENDED, 0x50, 0x01, 0x01, 0x80];
    pub const TURN_OFF: [u8; 6] = [HEAD, EXTENDED, 0x50, 0x01, 0x01, 0x00];
    pub const TOGGLE: [u8; 6] = [HEAD, EXTENDED, 0x50, 0x01, 0x02, 0x80];
    pub const READ_STATE: [u8; 4] = [HEAD, EXTENDED, 0x51, 0x01];

    pub const RESPONSE: ResponseSpec = ResponseSpec::exact(2, 1, &[0x00, 0x80]);

    /// Interprets a validated response: 0x80 is on, 0x00 is off.
    pub fn is_on(response: &[u8]) -> bool {
        response.get(1) == Some(&0x80)
    }
}

/// Shared sub-command grammar for the light families. The set-state opcode
/// differs per family (0x47 bulb and ceiling, 0x49 strip), the payload does
/// not.
pub mod light {
    use super::*;

    pub const SET_STATE: u8 = 0x47;
    pub const READ_STATE: u8 = 0x48;

    pub fn read(read_opcode: u8) -> [u8; 4] {
        [HEAD, EXTENDED, read_opcode, 0x01]
    }

    pub fn turn_on(set_opcode: u8) -> [u8; 6] {
        [HEAD, EXTENDED, set_opcode, 0x01, 0x01, 0x01]
    }

    pub fn turn_off(set_opcode: u8) -> [u8; 6] {
        [HEAD, EXTENDED, set_opcode, 0x01, 0x01, 0x02]
    }

    /// Brightness percent, clamped to 100.
    pub fn set_brightness(set_opcode: u8, brightness: u8) -> [u8; 7] {
        [HEAD, EXTENDED, set_opcode, 0x01, 0x02, 0x14, brightness.min(100)]
    }

    /// Color-temperature percent, clamped to 100. Strip lights do not
    /// support this sub-command.
    pub fn set_color_temperature(set_opcode: u8, percent: u8) -> [u8; 7] {
        [HEAD, EXTENDED, set_opcode, 0x01, 0x02, 0x17, percent.min(100)]
    }

    pub fn set_rgb(set_opcode: u8, brightness: u8, red: u8, green: u8, blue: u8) -> [u8; 10] {
        [
            HEAD,
            EXTENDED,
            set_opcode,
            0x01,
            0x02,
            0x12,
            brightness.min(100),
            red,
            green,
            blue,
        ]
    }

    pub const RESPONSE: ResponseSpec = ResponseSpec::exact(2, 1, &[0x00, 0x80]);

    /// Interprets a validated response: 0x80 is on, 0x00 is off.
    pub fn is_on(response: &[u8]) -> bool {
        response.get(1) == Some(&0x80)
    }
}

pub mod strip {
    pub const SET_STATE: u8 = 0x49;
    pub const READ_STATE: u8 = 0x4a;
}

pub mod lock {
    use super::*;

    pub const LOCK: [u8; 7] = [HEAD, EXTENDED, 0x4e, 0x01, 0x01, 0x10, 0x00];
    pub const UNLOCK: [u8; 7] = [HEAD, EXTENDED, 0x4e, 0x01, 0x01, 0x10, 0x80];
    pub const UNLOCK_NO_UNLATCH: [u8; 7] = [HEAD, EXTENDED, 0x4e, 0x01, 0x01, 0x10, 0xa0];
    pub const INFO: [u8; 5] = [HEAD, EXTENDED, 0x4f, 0x81, 0x01];

    /// Both lock generations share the notification switch.
    pub const ENABLE_NOTIFICATIONS: [u8; 9] =
        [HEAD, PLAIN, 0x01, 0x00, 0x1e, 0x00, 0x00, 0x81, 0x01];
    pub const DISABLE_NOTIFICATIONS: [u8; 3] = [HEAD, PLAIN, 0x00];

    /// 0x01 success, 0x06 success on low battery.
    pub const RESPONSE: ResponseSpec = ResponseSpec::at_least(3, 0, &[0x01, 0x06]);
}

pub mod lock_pro {
    use super::*;

    pub const LOCK: [u8; 8] = [HEAD, EXTENDED, 0x4e, 0x01, 0x01, 0x00, 0x00, 0x00];
    pub const UNLOCK: [u8; 8] = [HEAD, EXTENDED, 0x4e, 0x01, 0x01, 0x00, 0x00, 0x80];
    pub const UNLOCK_NO_UNLATCH: [u8; 8] = [HEAD, EXTENDED, 0x4e, 0x01, 0x01, 0x00, 0x00, 0xa0];
    pub const INFO: [u8; 5] = [HEAD, EXTENDED, 0x4f, 0x81, 0x02];
}

pub mod relay {
    use super::*;

    pub const TURN_OFF: [u8; 6] = [HEAD, EXTENDED, 0x70, 0x01, 0x00, 0x00];
    pub const TURN_ON: [u8; 6] = [HEAD, EXTENDED, 0x70, 0x01, 0x01, 0x00];
    pub const TOGGLE: [u8; 6] = [HEAD, EXTENDED, 0x70, 0x01, 0x02, 0x00];
    pub const READ_VOLTAGE_AND_CURRENT: [u8; 7] = [HEAD, EXTENDED, 0x71, 0x06, 0x00, 0x00, 0x00];

    pub const RESPONSE: ResponseSpec = ResponseSpec::at_least(1, 0, &[0x01]);

    /// Pulls the meter reading out of a validated (and, for the Plus,
    /// already decrypted) response. Raw units as reported by the firmware.
    pub fn voltage_and_current(response: &[u8]) -> Option<(u16, u16)> {
        if response.len() < 13 {
            return None;
        }
        let voltage = crate::fields::u16_be(response[9], response[10]);
        let current = crate::fields::u16_be(response[11], response[12]);
        Some((voltage, current))
    }
}
