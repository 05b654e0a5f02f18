//! Single-in-flight command channel.
//!
//! One mutex guards one transport: locking it is the in-flight slot, so two
//! commands against the same peripheral are serialized while independent
//! peripherals proceed concurrently. Stale notifications are drained before
//! every write, which keeps a late response from a timed-out command from
//! being read as the answer to the next one.

use std::time::Duration;

use data_encoding::HEXLOWER;
use tokio::sync::Mutex;
use wobot_proto::ble::COMMAND_TIMEOUT_MS;
use wobot_proto::{LengthRule, ResponseSpec};

use crate::error::Error;
use crate::transport::Transport;

/// Connection lifecycle of one peripheral. Transitions happen only through
/// explicit connect/disconnect calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

struct Inner<T> {
    transport: T,
    state: ConnectionState,
}

/// Serialized request/response exchange over one transport.
pub struct CommandChannel<T> {
    inner: Mutex<Inner<T>>,
    timeout: Duration,
}

impl<T: Transport> CommandChannel<T> {
    pub fn new(transport: T) -> Self {
        CommandChannel::with_timeout(transport, Duration::from_millis(COMMAND_TIMEOUT_MS))
    }

    pub fn with_timeout(transport: T, timeout: Duration) -> Self {
        CommandChannel {
            inner: Mutex::new(Inner {
                transport,
                state: ConnectionState::Disconnected,
            }),
            timeout,
        }
    }

    /// Replaces the response deadline for subsequent exchanges.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.state
    }

    pub async fn connect(&self) -> Result<(), Error> {
        self.inner.lock().await.ensure_connected().await
    }

    pub async fn disconnect(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        if inner.state == ConnectionState::Disconnected {
            return Ok(());
        }
        inner.state = ConnectionState::Disconnecting;
        let result = inner.transport.disconnect().await;
        inner.state = ConnectionState::Disconnected;
        result.map_err(Error::from)
    }

    /// Sends one frame and returns the next notification.
    ///
    /// Connects first if the channel is disconnected. Exactly one write and
    /// at most one notification per call; no retries here, retry policy
    /// belongs to the caller.
    pub async fn exchange(&self, frame: &[u8]) -> Result<Vec<u8>, Error> {
        let mut inner = self.inner.lock().await;
        inner.ensure_connected().await?;

        let mut stale = 0usize;
        while inner.transport.notifications().try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            tracing::debug!(count = stale, "discarded stale notifications");
        }

        inner.transport.write_command(frame).await?;

        match tokio::time::timeout(self.timeout, inner.transport.notifications().recv()).await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(Error::NotificationsClosed),
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "command timed out");
                Err(Error::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }
}

impl<T: Transport> Inner<T> {
    async fn ensure_connected(&mut self) -> Result<(), Error> {
        if self.state == ConnectionState::Connected {
            return Ok(());
        }
        self.state = ConnectionState::Connecting;
        match self.transport.connect().await {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Err(error) => {
                self.state = ConnectionState::Disconnected;
                Err(error.into())
            }
        }
    }
}

/// Checks a raw response against its family's spec: length first, then the
/// status byte. Failures carry the full hex dump.
pub fn validate(spec: &ResponseSpec, response: &[u8]) -> Result<(), Error> {
    if !spec.length_ok(response) {
        return Err(match spec.length {
            LengthRule::Exact(expected) => Error::ResponseLength {
                expected,
                response: HEXLOWER.encode(response),
            },
            LengthRule::AtLeast(_) => Error::Protocol {
                response: HEXLOWER.encode(response),
            },
        });
    }
    if !spec.status_ok(response) {
        return Err(Error::Protocol {
            response: HEXLOWER.encode(response),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reports_the_hex_dump() {
        let spec = ResponseSpec::exact(2, 1, &[0x00, 0x80]);
        let error = validate(&spec, &[0x01, 0x00, 0x00]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "expecting a 2-byte response, got instead: 0x010000"
        );

        let error = validate(&spec, &[0x01, 0x42]).unwrap_err();
        assert_eq!(error.to_string(), "the device returned an error: 0x0142");

        assert!(validate(&spec, &[0x01, 0x80]).is_ok());
    }

    #[test]
    fn at_least_rules_fold_length_into_protocol_errors() {
        let spec = ResponseSpec::at_least(3, 0, &[0x01, 0x06]);
        let error = validate(&spec, &[0x01]).unwrap_err();
        assert_eq!(error.to_string(), "the device returned an error: 0x01");
        assert!(validate(&spec, &[0x06, 0x00, 0x00, 0x00]).is_ok());
    }
}
