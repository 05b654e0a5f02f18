//! Pre-shared-key encryption for the lock and relay families.
//!
//! The cipher is AES-128-CTR, so encrypt and decrypt are the same keystream
//! XOR. A session negotiates its IV once, over the unencrypted path, and
//! reuses it for every exchange until [`EncryptionSession::reset`].

use aes::Aes128;
use ctr::Ctr128BE;
use ctr::cipher::{KeyIvInit, StreamCipher};
use data_encoding::HEXLOWER_PERMISSIVE;

use crate::error::{KeyError, SessionError};

type Aes128Ctr = Ctr128BE<Aes128>;

/// Pre-shared key material for one device.
///
/// Validation happens here, at construction, so a malformed key fails before
/// any transport activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceKey {
    key_id: u8,
    key: [u8; 16],
}

impl DeviceKey {
    /// Builds a key from its hex form: a 2-char key id and a 32-char key.
    pub fn new(key_id: &str, encryption_key: &str) -> Result<Self, KeyError> {
        if key_id.is_empty() {
            return Err(KeyError::KeyIdMissing);
        }
        if key_id.len() != 2 {
            return Err(KeyError::KeyIdInvalid);
        }
        let id = HEXLOWER_PERMISSIVE
            .decode(key_id.as_bytes())
            .map_err(|_| KeyError::KeyIdInvalid)?;
        if encryption_key.is_empty() {
            return Err(KeyError::EncryptionKeyMissing);
        }
        if encryption_key.len() != 32 {
            return Err(KeyError::EncryptionKeyInvalid);
        }
        let bytes = HEXLOWER_PERMISSIVE
            .decode(encryption_key.as_bytes())
            .map_err(|_| KeyError::EncryptionKeyInvalid)?;
        let mut key = [0u8; 16];
        key.copy_from_slice(&bytes);
        Ok(DeviceKey { key_id: id[0], key })
    }

    /// Relay switches advertise their key material in the GAP local name:
    /// the key is the first 32 characters, the key id the last 2.
    pub fn from_local_name(local_name: &str) -> Result<Self, KeyError> {
        let key_id = local_name
            .len()
            .checked_sub(2)
            .and_then(|start| local_name.get(start..))
            .unwrap_or("");
        let encryption_key = local_name.get(..32).unwrap_or("");
        DeviceKey::new(key_id, encryption_key)
    }

    pub fn key_id(&self) -> u8 {
        self.key_id
    }

    pub fn key_bytes(&self) -> &[u8; 16] {
        &self.key
    }
}

/// Encrypts `payload` with a fresh keystream. Empty payloads short-circuit
/// without touching the cipher.
pub fn encrypt(key: &[u8; 16], iv: &[u8; 16], payload: &[u8]) -> Vec<u8> {
    if payload.is_empty() {
        return Vec::new();
    }
    let mut buf = payload.to_vec();
    let mut cipher = Aes128Ctr::new(key.into(), iv.into());
    cipher.apply_keystream(&mut buf);
    buf
}

/// CTR decryption re-runs the encryption keystream.
pub fn decrypt(key: &[u8; 16], iv: &[u8; 16], payload: &[u8]) -> Vec<u8> {
    encrypt(key, iv, payload)
}

/// Wraps a command for the unencrypted path on an encryption-capable
/// device: header byte, three zero marker bytes, then the body verbatim.
pub fn plain_frame(command: &[u8]) -> Vec<u8> {
    let Some((&head, body)) = command.split_first() else {
        return Vec::new();
    };
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.push(head);
    frame.extend_from_slice(&[0x00, 0x00, 0x00]);
    frame.extend_from_slice(body);
    frame
}

/// One device object's encryption state: the pre-shared key plus the IV
/// cached from the negotiation exchange.
///
/// Owned by exactly one device object. Two device objects for the same
/// physical peripheral must each run their own negotiation.
#[derive(Debug, Clone)]
pub struct EncryptionSession {
    key: DeviceKey,
    iv: Option<[u8; 16]>,
}

impl EncryptionSession {
    pub fn new(key: DeviceKey) -> Self {
        EncryptionSession { key, iv: None }
    }

    pub fn key_id(&self) -> u8 {
        self.key.key_id
    }

    pub fn iv_ready(&self) -> bool {
        self.iv.is_some()
    }

    /// Caches the IV from a negotiation response: everything after the
    /// 4-byte header, which must be exactly 16 bytes.
    pub fn adopt_iv(&mut self, negotiation_response: &[u8]) -> Result<(), SessionError> {
        let tail = negotiation_response.get(4..).unwrap_or(&[]);
        let iv: [u8; 16] = tail
            .try_into()
            .map_err(|_| SessionError::IvLength { actual: tail.len() })?;
        self.iv = Some(iv);
        Ok(())
    }

    /// Drops the cached IV. Call on reconnect, the peripheral issues a new
    /// vector per connection.
    pub fn reset(&mut self) {
        self.iv = None;
    }

    /// Builds the encrypted wire frame: the command's header byte, the key
    /// id, the first two IV bytes, then the encrypted command body.
    pub fn seal(&self, command: &[u8]) -> Result<Vec<u8>, SessionError> {
        let iv = self.iv.as_ref().ok_or(SessionError::IvMissing)?;
        let Some((&head, body)) = command.split_first() else {
            return Ok(Vec::new());
        };
        let mut frame = vec![head, self.key.key_id, iv[0], iv[1]];
        frame.extend_from_slice(&encrypt(&self.key.key, iv, body));
        Ok(frame)
    }

    /// Recovers the plain response: the status byte survives unchanged, the
    /// body after the 4-byte header is decrypted.
    pub fn open(&self, response: &[u8]) -> Result<Vec<u8>, SessionError> {
        let iv = self.iv.as_ref().ok_or(SessionError::IvMissing)?;
        let Some((&status, rest)) = response.split_first() else {
            return Ok(Vec::new());
        };
        let body = rest.get(3..).unwrap_or(&[]);
        let mut plain = Vec::with_capacity(1 + body.len());
        plain.push(status);
        plain.extend_from_slice(&decrypt(&self.key.key, iv, body));
        Ok(plain)
    }
}
