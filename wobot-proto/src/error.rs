//! Error types for the pure protocol layer.

use thiserror::Error;

/// Why an advertisement failed to decode.
///
/// Decode failures are not fatal: scanning reports them through the
/// diagnostic sink and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{parser}: service data too short: need {needed} bytes, got {actual}")]
    ServiceDataTooShort {
        parser: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("{parser}: service data length {actual} != {expected}")]
    ServiceDataLength {
        parser: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{parser}: manufacturer data too short: need {needed} bytes, got {actual}")]
    ManufacturerDataTooShort {
        parser: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("{parser}: manufacturer data length {actual} != {expected}")]
    ManufacturerDataLength {
        parser: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{parser}: model id 0x{found:02x} != 0x{expected:02x}")]
    ModelIdMismatch {
        parser: &'static str,
        expected: u8,
        found: u8,
    },

    #[error("no parser for discriminator 0x{discriminator:02x}")]
    UnknownModel { discriminator: u8 },

    #[error("empty service data")]
    EmptyServiceData,
}

impl DecodeError {
    /// Name of the parser that rejected the frame, when one was reached.
    pub fn parser(&self) -> Option<&'static str> {
        match self {
            DecodeError::ServiceDataTooShort { parser, .. }
            | DecodeError::ServiceDataLength { parser, .. }
            | DecodeError::ManufacturerDataTooShort { parser, .. }
            | DecodeError::ManufacturerDataLength { parser, .. }
            | DecodeError::ModelIdMismatch { parser, .. } => Some(parser),
            DecodeError::UnknownModel { .. } | DecodeError::EmptyServiceData => None,
        }
    }
}

/// Key-material validation failures. Raised synchronously when a key is
/// constructed, before any transport activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("key_id is missing")]
    KeyIdMissing,
    #[error("key_id is invalid")]
    KeyIdInvalid,
    #[error("encryption_key is missing")]
    EncryptionKeyMissing,
    #[error("encryption_key is invalid")]
    EncryptionKeyInvalid,
}

/// Argument validation failures in command builders. Raised before any
/// frame is produced, so a bad argument never reaches the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("level must be between 0 and 100")]
    LevelOutOfRange { level: u8 },
}

/// Encryption-session failures past key validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("iv negotiation returned {actual} tail bytes, need 16")]
    IvLength { actual: usize },
    #[error("iv not negotiated")]
    IvMissing,
}
