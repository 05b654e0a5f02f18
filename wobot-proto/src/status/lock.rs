//! Smart lock, both generations. The Pro moved every advertisement field
//! to new positions, so the two layouts parse separately into one record.

use serde::Serialize;

use crate::error::DecodeError;
use crate::fields::{bit, low7};
use crate::model::Model;

/// Three-bit deadbolt state, total over all eight codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LockState {
    Locked,
    Unlocked,
    Locking,
    Unlocking,
    LockingStop,
    UnlockingStop,
    NotFullyLocked,
    Unknown,
}

impl LockState {
    pub fn from_bits(code: u8) -> LockState {
        match code & 0x07 {
            0 => LockState::Locked,
            1 => LockState::Unlocked,
            2 => LockState::Locking,
            3 => LockState::Unlocking,
            4 => LockState::LockingStop,
            5 => LockState::UnlockingStop,
            6 => LockState::NotFullyLocked,
            _ => LockState::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockAdvertisement {
    pub model: Model,
    pub battery: u8,
    pub calibration: bool,
    pub status: LockState,
    pub update_from_secondary_lock: bool,
    pub door_open: bool,
    pub double_lock_mode: bool,
    pub unclosed_alarm: bool,
    pub unlocked_alarm: bool,
    pub auto_lock_paused: bool,
    pub night_latch: bool,
}

pub fn parse(
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<LockAdvertisement, DecodeError> {
    if service_data.len() < 3 {
        return Err(DecodeError::ServiceDataTooShort {
            parser: Model::Lock.name(),
            needed: 3,
            actual: service_data.len(),
        });
    }
    if manufacturer_data.len() < 11 {
        return Err(DecodeError::ManufacturerDataTooShort {
            parser: Model::Lock.name(),
            needed: 11,
            actual: manufacturer_data.len(),
        });
    }
    let flags = manufacturer_data[9];
    let alarms = manufacturer_data[10];
    Ok(LockAdvertisement {
        model: Model::Lock,
        battery: low7(service_data[2]),
        calibration: bit(flags, 0x80),
        status: LockState::from_bits((flags & 0x70) >> 4),
        update_from_secondary_lock: bit(flags, 0x08),
        door_open: bit(flags, 0x04),
        double_lock_mode: bit(alarms, 0x80),
        unclosed_alarm: bit(alarms, 0x40),
        unlocked_alarm: bit(alarms, 0x10),
        auto_lock_paused: bit(alarms, 0x02),
        night_latch: manufacturer_data.len() > 11 && bit(manufacturer_data[11], 0x01),
    })
}

pub fn parse_pro(
    service_data: &[u8],
    manufacturer_data: &[u8],
) -> Result<LockAdvertisement, DecodeError> {
    if service_data.len() < 3 {
        return Err(DecodeError::ServiceDataTooShort {
            parser: Model::LockPro.name(),
            needed: 3,
            actual: service_data.len(),
        });
    }
    if manufacturer_data.len() < 12 {
        return Err(DecodeError::ManufacturerDataTooShort {
            parser: Model::LockPro.name(),
            needed: 12,
            actual: manufacturer_data.len(),
        });
    }
    Ok(LockAdvertisement {
        model: Model::LockPro,
        battery: low7(service_data[2]),
        calibration: bit(manufacturer_data[7], 0x80),
        status: LockState::from_bits((manufacturer_data[7] & 0x38) >> 3),
        // The Pro does not report these two; they always read false.
        update_from_secondary_lock: false,
        double_lock_mode: false,
        door_open: bit(manufacturer_data[8], 0x40),
        auto_lock_paused: bit(manufacturer_data[8], 0x20),
        night_latch: bit(manufacturer_data[9], 0x01),
        unclosed_alarm: bit(manufacturer_data[11], 0x80),
        unlocked_alarm: bit(manufacturer_data[11], 0x40),
    })
}

/// Decoded payload of the lock-info exchange. Byte 0 of the response is the
/// acknowledgement code; the state bits start at byte 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockInfo {
    pub calibration: bool,
    pub status: LockState,
    pub door_open: bool,
    pub unclosed_alarm: bool,
    pub unlocked_alarm: bool,
}

pub fn parse_info(response: &[u8]) -> Option<LockInfo> {
    if response.len() < 3 {
        return None;
    }
    Some(LockInfo {
        calibration: bit(response[1], 0x80),
        status: LockState::from_bits((response[1] & 0x70) >> 4),
        door_open: bit(response[1], 0x04),
        unclosed_alarm: bit(response[2], 0x20),
        unlocked_alarm: bit(response[2], 0x10),
    })
}
