//! Wobot protocol core - advertisement decoding, command frames, and the
//! pre-shared-key encryption overlay.
//!
//! This crate is pure: bytes in, typed records and frames out. Transport
//! concerns (scanning, connecting, notifications) live in `wobot-ble`.

pub mod advertisement;
pub mod ble;
pub mod commands;
pub mod crypto;
mod error;
pub mod fields;
mod model;
mod registry;
pub mod status;

pub use advertisement::{Advertisement, DiagnosticSink, NullSink, decode, decode_as};
pub use commands::{LengthRule, ResponseSpec};
pub use crypto::{DeviceKey, EncryptionSession};
pub use error::{CommandError, DecodeError, KeyError, SessionError};
pub use model::Model;
pub use registry::{Capabilities, CommandFamily};
pub use status::DeviceStatus;
