//! End-to-end command flow over a scripted transport: connect-on-demand,
//! single-in-flight exchanges, response validation, and the encryption
//! overlay, with no radio anywhere near the tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use wobot_ble::{CommandChannel, ConnectionState, Device, Error, Transport, TransportError};
use wobot_proto::commands::{bot, get_ck_iv};
use wobot_proto::crypto::{encrypt, plain_frame};
use wobot_proto::status::lock::LockState;
use wobot_proto::{DeviceKey, Model};

const KEY_ID: &str = "0f";
const KEY: &str = "00112233445566778899aabbccddeeff";

/// Records every write and answers each one from a scripted queue. A write
/// with nothing scripted gets no response at all.
struct ScriptedTransport {
    notify: mpsc::Sender<Vec<u8>>,
    rx: mpsc::Receiver<Vec<u8>>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    responses: Arc<Mutex<VecDeque<Vec<u8>>>>,
    connects: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    refuse_connect: bool,
    write_delay: Option<Duration>,
}

/// Test-side handle onto a [`ScriptedTransport`] that has been moved into a
/// channel or device.
struct Script {
    notify: mpsc::Sender<Vec<u8>>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    responses: Arc<Mutex<VecDeque<Vec<u8>>>>,
    connects: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

fn scripted() -> (ScriptedTransport, Script) {
    let (notify, rx) = mpsc::channel(16);
    let writes = Arc::new(Mutex::new(Vec::new()));
    let responses = Arc::new(Mutex::new(VecDeque::new()));
    let connects = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let transport = ScriptedTransport {
        notify: notify.clone(),
        rx,
        writes: writes.clone(),
        responses: responses.clone(),
        connects: connects.clone(),
        in_flight: Arc::new(AtomicUsize::new(0)),
        max_in_flight: max_in_flight.clone(),
        refuse_connect: false,
        write_delay: None,
    };
    let script = Script {
        notify,
        writes,
        responses,
        connects,
        max_in_flight,
    };
    (transport, script)
}

impl Script {
    fn respond(&self, response: &[u8]) {
        self.responses
            .lock()
            .unwrap()
            .push_back(response.to_vec());
    }

    /// Injects a notification outside the write/respond cycle, as a
    /// response arriving after its command already timed out would.
    async fn push_late(&self, response: Vec<u8>) {
        self.notify.send(response).await.unwrap();
    }

    fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.refuse_connect {
            return Err(TransportError::NotConnected);
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn write_command(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let depth = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(depth, Ordering::SeqCst);
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        self.writes.lock().unwrap().push(frame.to_vec());
        let response = self.responses.lock().unwrap().pop_front();
        if let Some(response) = response {
            let _ = self.notify.send(response).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    fn notifications(&mut self) -> &mut mpsc::Receiver<Vec<u8>> {
        &mut self.rx
    }
}

#[tokio::test]
async fn commands_connect_on_demand() {
    let (transport, script) = scripted();
    script.respond(&[0x01, 0x00, 0x00]);
    script.respond(&[0x01, 0x00, 0x00]);

    let mut device = Device::new(Model::Bot, transport);
    assert_eq!(device.state().await, ConnectionState::Disconnected);

    device.press().await.unwrap();
    assert_eq!(device.state().await, ConnectionState::Connected);

    device.press().await.unwrap();
    assert_eq!(script.connects(), 1);
    assert_eq!(script.writes().len(), 2);

    device.disconnect().await.unwrap();
    assert_eq!(device.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn a_refused_connect_leaves_the_channel_disconnected() {
    let (mut transport, _script) = scripted();
    transport.refuse_connect = true;

    let channel = CommandChannel::new(transport);
    assert!(channel.connect().await.is_err());
    assert_eq!(channel.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn a_missing_response_times_out() {
    let (transport, _script) = scripted();
    let channel = CommandChannel::with_timeout(transport, Duration::from_millis(50));

    let error = channel.exchange(&bot::PRESS).await.unwrap_err();
    assert!(matches!(error, Error::Timeout { timeout_ms: 50 }));
    assert_eq!(error.to_string(), "no response within 50 ms");
}

#[tokio::test]
async fn late_responses_never_cross_talk() {
    let (transport, script) = scripted();
    let channel = CommandChannel::with_timeout(transport, Duration::from_millis(50));

    let first = channel.exchange(&bot::PRESS).await;
    assert!(matches!(first, Err(Error::Timeout { .. })));

    // The press response finally shows up, then the next command runs.
    script.push_late(vec![0xde, 0xad]).await;
    script.respond(&[0x01, 0x00, 0x00]);

    let second = channel.exchange(&bot::TURN_ON).await.unwrap();
    assert_eq!(second, [0x01, 0x00, 0x00]);
}

#[tokio::test]
async fn exchanges_on_one_channel_never_overlap() {
    let (mut transport, script) = scripted();
    transport.write_delay = Some(Duration::from_millis(20));
    script.respond(&[0x01, 0x00, 0x00]);
    script.respond(&[0x05, 0x00, 0x00]);

    let channel = CommandChannel::new(transport);
    let (first, second) = futures::join!(
        channel.exchange(&bot::PRESS),
        channel.exchange(&bot::TURN_OFF)
    );
    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(script.writes().len(), 2);
    assert_eq!(script.max_in_flight(), 1);
}

#[tokio::test]
async fn actions_are_gated_before_the_transport() {
    let (transport, script) = scripted();
    let mut device = Device::new(Model::Meter, transport);

    let error = device.press().await.unwrap_err();
    assert_eq!(error.to_string(), "Meter does not support press");
    assert_eq!(script.connects(), 0);
    assert!(script.writes().is_empty());

    let (transport, script) = scripted();
    let mut device = Device::new(Model::Bot, transport);
    let error = device.toggle().await.unwrap_err();
    assert_eq!(error.to_string(), "Bot does not support toggle");
    assert!(script.writes().is_empty());
}

#[tokio::test]
async fn humidifier_range_check_precedes_any_write() {
    let (transport, script) = scripted();
    let mut device = Device::new(Model::Humidifier, transport);

    let error = device.set_percentage(101).await.unwrap_err();
    assert_eq!(error.to_string(), "level must be between 0 and 100");
    assert_eq!(script.connects(), 0);
    assert!(script.writes().is_empty());
}

#[tokio::test]
async fn encrypted_families_demand_a_key() {
    let (transport, script) = scripted();
    let mut device = Device::new(Model::Lock, transport);

    let error = device.lock().await.unwrap_err();
    assert_eq!(error.to_string(), "encryption_key is missing");
    assert_eq!(script.connects(), 0);
}

#[tokio::test]
async fn iv_negotiation_happens_once_per_session() {
    let (transport, script) = scripted();
    let key = DeviceKey::new(KEY_ID, KEY).unwrap();
    let iv = [0xa5u8; 16];

    let mut negotiation = vec![0x01, 0x00, 0x00, 0x00];
    negotiation.extend_from_slice(&iv);
    script.respond(&negotiation);
    script.respond(&[0x01, 0x00, 0x00, 0x00]);
    script.respond(&[0x01, 0x00, 0x00, 0x00]);

    let mut device = Device::with_key(Model::Lock, transport, key.clone());
    device.lock().await.unwrap();
    device.unlock().await.unwrap();

    let writes = script.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0], plain_frame(&get_ck_iv(0x0f)));

    // Sealed layout: command head, key id, first two IV bytes, ciphertext.
    let expected_tail = encrypt(key.key_bytes(), &iv, &wobot_proto::commands::lock::LOCK[1..]);
    assert_eq!(writes[1][..4], [0x57, 0x0f, 0xa5, 0xa5]);
    assert_eq!(writes[1][4..], expected_tail);
    assert_eq!(writes[2][..4], [0x57, 0x0f, 0xa5, 0xa5]);
    assert_eq!(script.connects(), 1);

    // Dropping the session forces a fresh negotiation.
    script.respond(&negotiation);
    script.respond(&[0x01, 0x00, 0x00, 0x00]);
    device.reset_session();
    device.lock().await.unwrap();
    let writes = script.writes();
    assert_eq!(writes.len(), 5);
    assert_eq!(writes[3], plain_frame(&get_ck_iv(0x0f)));
}

#[tokio::test]
async fn failed_negotiation_surfaces_the_hex_dump() {
    let (transport, script) = scripted();
    script.respond(&[0x00, 0x00, 0x00]);

    let key = DeviceKey::new(KEY_ID, KEY).unwrap();
    let mut device = Device::with_key(Model::Lock, transport, key);
    let error = device.lock().await.unwrap_err();
    assert_eq!(error.to_string(), "the device returned an error: 0x000000");
}

#[tokio::test]
async fn short_or_errored_plug_responses_are_protocol_errors() {
    let (transport, script) = scripted();
    let mut device = Device::new(Model::PlugMiniUs, transport);

    script.respond(&[0x01, 0x00, 0x00]);
    let error = device.turn_on().await.unwrap_err();
    assert_eq!(
        error.to_string(),
        "expecting a 2-byte response, got instead: 0x010000"
    );

    script.respond(&[0x01, 0x42]);
    let error = device.turn_on().await.unwrap_err();
    assert_eq!(error.to_string(), "the device returned an error: 0x0142");

    script.respond(&[0x01, 0x80]);
    assert!(device.read_state().await.unwrap());
    script.respond(&[0x01, 0x00]);
    assert!(!device.read_state().await.unwrap());
}

#[tokio::test]
async fn lock_info_decrypts_the_payload() {
    let (transport, script) = scripted();
    let key = DeviceKey::new(KEY_ID, KEY).unwrap();
    let iv = [0xb4u8; 16];

    let mut negotiation = vec![0x01, 0x00, 0x00, 0x00];
    negotiation.extend_from_slice(&iv);
    script.respond(&negotiation);
    let mut info_response = vec![0x01, 0x00, 0x00, 0x00];
    info_response.extend_from_slice(&encrypt(key.key_bytes(), &iv, &[0x80, 0x30]));
    script.respond(&info_response);

    let mut device = Device::with_key(Model::Lock, transport, key);
    let info = device.info().await.unwrap();
    assert!(info.calibration);
    assert_eq!(info.status, LockState::Locked);
    assert!(!info.door_open);
    assert!(info.unclosed_alarm);
    assert!(info.unlocked_alarm);
}

#[tokio::test]
async fn relay_metering_reads_the_decrypted_words() {
    let (transport, script) = scripted();
    // Relay switches carry their key material in the advertised name.
    let key = DeviceKey::from_local_name("00112233445566778899aabbccddeeff0f").unwrap();
    let iv = [0x3cu8; 16];

    let mut negotiation = vec![0x01, 0x00, 0x00, 0x00];
    negotiation.extend_from_slice(&iv);
    script.respond(&negotiation);

    let mut plaintext = [0u8; 12];
    plaintext[8] = 0x00;
    plaintext[9] = 0xe6;
    plaintext[10] = 0x01;
    plaintext[11] = 0x2c;
    let mut reading = vec![0x01, 0x00, 0x00, 0x00];
    reading.extend_from_slice(&encrypt(key.key_bytes(), &iv, &plaintext));
    script.respond(&reading);

    let mut device = Device::with_key(Model::RelaySwitch1Pm, transport, key);
    let (voltage, current) = device.voltage_and_current().await.unwrap();
    assert_eq!(voltage, 230);
    assert_eq!(current, 300);
}
