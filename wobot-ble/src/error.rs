//! Error type for transport-facing operations.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum Error {
    /// Response status byte outside the family's accepted set, or a
    /// malformed response body. Carries the full hex dump.
    #[error("the device returned an error: 0x{response}")]
    Protocol { response: String },

    #[error("expecting a {expected}-byte response, got instead: 0x{response}")]
    ResponseLength { expected: usize, response: String },

    #[error("no response within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The notification stream ended while a response was pending.
    #[error("notification stream closed")]
    NotificationsClosed,

    #[error("{model} does not support {action}")]
    Unsupported {
        model: &'static str,
        action: &'static str,
    },

    #[error(transparent)]
    Key(#[from] wobot_proto::KeyError),

    #[error(transparent)]
    Command(#[from] wobot_proto::CommandError),

    #[error(transparent)]
    Session(#[from] wobot_proto::SessionError),

    #[error(transparent)]
    Decode(#[from] wobot_proto::DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
