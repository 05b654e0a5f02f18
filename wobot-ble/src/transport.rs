//! Transport seam between the protocol layer and the BLE host stack.
//!
//! [`Transport`] is the minimal surface the command channel needs: connect,
//! disconnect, write one frame, receive notifications. [`BtleTransport`]
//! implements it over btleplug; tests swap in a scripted transport.

use btleplug::api::{Characteristic, Peripheral as _, WriteType};
use btleplug::platform::Peripheral;
use futures::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use wobot_proto::ble::{DEVICE_NAME_UUID, NOTIFY_UUID, WRITE_UUID};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("bluetooth: {0}")]
    Bluetooth(#[from] btleplug::Error),

    #[error("no bluetooth adapter found")]
    AdapterMissing,

    #[error("characteristic {uuid} not found")]
    CharacteristicMissing { uuid: Uuid },

    #[error("not connected")]
    NotConnected,
}

/// Connection-oriented byte transport for one peripheral.
pub trait Transport {
    async fn connect(&mut self) -> Result<(), TransportError>;

    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Writes one command frame to the write characteristic.
    async fn write_command(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Response notifications, in arrival order. The command channel owns
    /// draining and timeout policy.
    fn notifications(&mut self) -> &mut mpsc::Receiver<Vec<u8>>;
}

fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("invalid UUID in wobot_proto")
}

/// btleplug-backed transport speaking the vendor GATT service.
pub struct BtleTransport {
    peripheral: Peripheral,
    write_characteristic: Option<Characteristic>,
    notify_characteristic: Option<Characteristic>,
    tx: mpsc::Sender<Vec<u8>>,
    rx: mpsc::Receiver<Vec<u8>>,
    forward: Option<JoinHandle<()>>,
}

impl BtleTransport {
    pub fn new(peripheral: Peripheral) -> Self {
        let (tx, rx) = mpsc::channel(16);
        BtleTransport {
            peripheral,
            write_characteristic: None,
            notify_characteristic: None,
            tx,
            rx,
            forward: None,
        }
    }

    fn characteristic(&self, uuid: Uuid) -> Result<Characteristic, TransportError> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == uuid)
            .ok_or(TransportError::CharacteristicMissing { uuid })
    }

    /// Reads the GAP device name. Relay switches carry their key material
    /// in it.
    pub async fn read_device_name(&self) -> Result<String, TransportError> {
        let characteristic = self.characteristic(parse_uuid(DEVICE_NAME_UUID))?;
        let raw = self.peripheral.read(&characteristic).await?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

impl Transport for BtleTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.peripheral.connect().await?;
        self.peripheral.discover_services().await?;

        let write = self.characteristic(parse_uuid(WRITE_UUID))?;
        let notify = self.characteristic(parse_uuid(NOTIFY_UUID))?;

        self.peripheral.subscribe(&notify).await?;
        let mut stream = self.peripheral.notifications().await?;
        let tx = self.tx.clone();
        let notify_uuid = notify.uuid;
        self.forward = Some(tokio::spawn(async move {
            while let Some(notification) = stream.next().await {
                if notification.uuid != notify_uuid {
                    continue;
                }
                if tx.send(notification.value).await.is_err() {
                    break;
                }
            }
        }));
        self.write_characteristic = Some(write);
        self.notify_characteristic = Some(notify);
        tracing::debug!(address = %self.peripheral.address(), "connected");
        Ok(())
    }

    /// Unsubscribe and disconnect are best-effort: a radio that is already
    /// gone should not wedge the state machine.
    async fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(forward) = self.forward.take() {
            forward.abort();
        }
        if let Some(notify) = self.notify_characteristic.take() {
            if let Err(error) = self.peripheral.unsubscribe(&notify).await {
                tracing::warn!(%error, "unsubscribe failed");
            }
        }
        self.write_characteristic = None;
        if let Err(error) = self.peripheral.disconnect().await {
            tracing::warn!(%error, "disconnect failed");
            return Err(error.into());
        }
        tracing::debug!(address = %self.peripheral.address(), "disconnected");
        Ok(())
    }

    async fn write_command(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let characteristic = self
            .write_characteristic
            .as_ref()
            .ok_or(TransportError::NotConnected)?;
        self.peripheral
            .write(characteristic, frame, WriteType::WithResponse)
            .await?;
        Ok(())
    }

    fn notifications(&mut self) -> &mut mpsc::Receiver<Vec<u8>> {
        &mut self.rx
    }
}
