//! Device objects: a transport plus the capability set of one model.
//!
//! Every action is gated on the capability registry before anything touches
//! the transport, so calling `press` on a meter fails locally with a clear
//! error. Encrypted families route through the AES-128-CTR overlay and
//! negotiate their IV lazily on the first encrypted command.

use std::time::Duration;

use data_encoding::HEXLOWER;
use wobot_proto::commands::{
    bot, curtain, get_ck_iv, humidifier, light, lock, lock_pro, plug, relay, strip,
};
use wobot_proto::crypto::plain_frame;
use wobot_proto::status::lock::{parse_info, LockInfo};
use wobot_proto::{
    Capabilities, CommandFamily, DeviceKey, EncryptionSession, KeyError, Model, ResponseSpec,
};

use crate::channel::{validate, CommandChannel, ConnectionState};
use crate::error::Error;
use crate::transport::Transport;

/// One controllable (or at least connectable) peripheral.
pub struct Device<T> {
    capabilities: Capabilities,
    channel: CommandChannel<T>,
    session: Option<EncryptionSession>,
}

impl<T: Transport> Device<T> {
    /// A device without key material. Encrypted families built this way
    /// refuse their commands until constructed with a key instead.
    pub fn new(model: Model, transport: T) -> Self {
        Device {
            capabilities: Capabilities::for_model(model),
            channel: CommandChannel::new(transport),
            session: None,
        }
    }

    /// A device with pre-shared key material. The key was validated when
    /// [`DeviceKey`] was built, so construction itself cannot fail.
    pub fn with_key(model: Model, transport: T, key: DeviceKey) -> Self {
        Device {
            capabilities: Capabilities::for_model(model),
            channel: CommandChannel::new(transport),
            session: Some(EncryptionSession::new(key)),
        }
    }

    /// Replaces the default 3000 ms response deadline.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.channel.set_timeout(timeout);
        self
    }

    pub fn model(&self) -> Model {
        self.capabilities.model
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub async fn state(&self) -> ConnectionState {
        self.channel.state().await
    }

    pub async fn connect(&self) -> Result<(), Error> {
        self.channel.connect().await
    }

    /// Disconnects the transport. The encryption session keeps its IV; a
    /// later command on a reconnect reuses it unless [`Device::reset_session`]
    /// ran in between.
    pub async fn disconnect(&self) -> Result<(), Error> {
        self.channel.disconnect().await
    }

    /// Drops the negotiated IV so the next encrypted command renegotiates.
    pub fn reset_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
        }
    }

    fn family(&self, action: &'static str) -> Result<CommandFamily, Error> {
        self.capabilities.family.ok_or(Error::Unsupported {
            model: self.capabilities.model.display_name(),
            action,
        })
    }

    fn unsupported(&self, action: &'static str) -> Error {
        Error::Unsupported {
            model: self.capabilities.model.display_name(),
            action,
        }
    }

    /// One command on whichever path the family uses. Returns the readable
    /// response: raw bytes for plain families, the decrypted frame for
    /// encrypted ones.
    async fn execute(&mut self, frame: &[u8], spec: &ResponseSpec) -> Result<Vec<u8>, Error> {
        if self.capabilities.requires_encryption() {
            return self.execute_encrypted(frame, spec).await;
        }
        let response = self.channel.exchange(frame).await?;
        validate(spec, &response)?;
        Ok(response)
    }

    async fn execute_encrypted(
        &mut self,
        frame: &[u8],
        spec: &ResponseSpec,
    ) -> Result<Vec<u8>, Error> {
        let session = self
            .session
            .as_mut()
            .ok_or(Error::Key(KeyError::EncryptionKeyMissing))?;
        if !session.iv_ready() {
            let negotiation = plain_frame(&get_ck_iv(session.key_id()));
            let response = self.channel.exchange(&negotiation).await?;
            validate(spec, &response)?;
            session.adopt_iv(&response)?;
        }
        let sealed = session.seal(frame)?;
        let raw = self.channel.exchange(&sealed).await?;
        validate(spec, &raw)?;
        Ok(session.open(&raw)?)
    }

    async fn run(&mut self, frame: &[u8], spec: &ResponseSpec) -> Result<(), Error> {
        self.execute(frame, spec).await.map(drop)
    }
}

/// Power switching, shared verb across every family that has an on/off
/// notion. Bots in press mode still accept these; the arm just returns.
impl<T: Transport> Device<T> {
    pub async fn turn_on(&mut self) -> Result<(), Error> {
        const ACTION: &str = "turn on";
        match self.family(ACTION)? {
            CommandFamily::Bot => self.run(&bot::TURN_ON, &bot::RESPONSE).await,
            CommandFamily::Humidifier => {
                self.run(&humidifier::TURN_ON, &humidifier::RESPONSE).await
            }
            CommandFamily::Plug => self.run(&plug::TURN_ON, &plug::RESPONSE).await,
            CommandFamily::ColorBulb | CommandFamily::CeilingLight => {
                self.run(&light::turn_on(light::SET_STATE), &light::RESPONSE)
                    .await
            }
            CommandFamily::StripLight => {
                self.run(&light::turn_on(strip::SET_STATE), &light::RESPONSE)
                    .await
            }
            CommandFamily::Relay => self.run(&relay::TURN_ON, &relay::RESPONSE).await,
            CommandFamily::Curtain | CommandFamily::Lock | CommandFamily::LockPro => {
                Err(self.unsupported(ACTION))
            }
        }
    }

    pub async fn turn_off(&mut self) -> Result<(), Error> {
        const ACTION: &str = "turn off";
        match self.family(ACTION)? {
            CommandFamily::Bot => self.run(&bot::TURN_OFF, &bot::RESPONSE).await,
            CommandFamily::Humidifier => {
                self.run(&humidifier::TURN_OFF, &humidifier::RESPONSE).await
            }
            CommandFamily::Plug => self.run(&plug::TURN_OFF, &plug::RESPONSE).await,
            CommandFamily::ColorBulb | CommandFamily::CeilingLight => {
                self.run(&light::turn_off(light::SET_STATE), &light::RESPONSE)
                    .await
            }
            CommandFamily::StripLight => {
                self.run(&light::turn_off(strip::SET_STATE), &light::RESPONSE)
                    .await
            }
            CommandFamily::Relay => self.run(&relay::TURN_OFF, &relay::RESPONSE).await,
            CommandFamily::Curtain | CommandFamily::Lock | CommandFamily::LockPro => {
                Err(self.unsupported(ACTION))
            }
        }
    }

    pub async fn toggle(&mut self) -> Result<(), Error> {
        const ACTION: &str = "toggle";
        match self.family(ACTION)? {
            CommandFamily::Plug => self.run(&plug::TOGGLE, &plug::RESPONSE).await,
            CommandFamily::Relay => self.run(&relay::TOGGLE, &relay::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }

    /// Reads the on/off bit back from plug and light families.
    pub async fn read_state(&mut self) -> Result<bool, Error> {
        const ACTION: &str = "read state";
        match self.family(ACTION)? {
            CommandFamily::Plug => {
                let response = self.execute(&plug::READ_STATE, &plug::RESPONSE).await?;
                Ok(plug::is_on(&response))
            }
            CommandFamily::ColorBulb | CommandFamily::CeilingLight => {
                let frame = light::read(light::READ_STATE);
                let response = self.execute(&frame, &light::RESPONSE).await?;
                Ok(light::is_on(&response))
            }
            CommandFamily::StripLight => {
                let frame = light::read(strip::READ_STATE);
                let response = self.execute(&frame, &light::RESPONSE).await?;
                Ok(light::is_on(&response))
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }
}

/// Bot arm movement.
impl<T: Transport> Device<T> {
    pub async fn press(&mut self) -> Result<(), Error> {
        const ACTION: &str = "press";
        match self.family(ACTION)? {
            CommandFamily::Bot => self.run(&bot::PRESS, &bot::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn down(&mut self) -> Result<(), Error> {
        const ACTION: &str = "move the arm down";
        match self.family(ACTION)? {
            CommandFamily::Bot => self.run(&bot::DOWN, &bot::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn up(&mut self) -> Result<(), Error> {
        const ACTION: &str = "move the arm up";
        match self.family(ACTION)? {
            CommandFamily::Bot => self.run(&bot::UP, &bot::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }
}

/// Curtain movement.
impl<T: Transport> Device<T> {
    pub async fn open(&mut self) -> Result<(), Error> {
        const ACTION: &str = "open";
        match self.family(ACTION)? {
            CommandFamily::Curtain => self.run(&curtain::open(), &curtain::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn close(&mut self) -> Result<(), Error> {
        const ACTION: &str = "close";
        match self.family(ACTION)? {
            CommandFamily::Curtain => self.run(&curtain::close(), &curtain::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn pause(&mut self) -> Result<(), Error> {
        const ACTION: &str = "pause";
        match self.family(ACTION)? {
            CommandFamily::Curtain => self.run(&curtain::PAUSE, &curtain::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }

    /// Runs to an absolute position at the default speed, 0 fully open to
    /// 100 fully closed.
    pub async fn run_to(&mut self, position: u8) -> Result<(), Error> {
        self.run_to_in_mode(position, curtain::DEFAULT_MODE).await
    }

    pub async fn run_to_in_mode(&mut self, position: u8, mode: u8) -> Result<(), Error> {
        const ACTION: &str = "run to a position";
        match self.family(ACTION)? {
            CommandFamily::Curtain => {
                self.run(&curtain::run_to(position, mode), &curtain::RESPONSE)
                    .await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }
}

/// Humidifier mist control.
impl<T: Transport> Device<T> {
    /// Sets the target mist level. The range check runs before the connect,
    /// so an out-of-range level never opens the link.
    pub async fn set_percentage(&mut self, level: u8) -> Result<(), Error> {
        const ACTION: &str = "set a mist percentage";
        match self.family(ACTION)? {
            CommandFamily::Humidifier => {
                let frame = humidifier::set_percentage(level)?;
                self.run(&frame, &humidifier::RESPONSE).await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn increase(&mut self) -> Result<(), Error> {
        const ACTION: &str = "increase the mist level";
        match self.family(ACTION)? {
            CommandFamily::Humidifier => {
                self.run(&humidifier::INCREASE, &humidifier::RESPONSE).await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn decrease(&mut self) -> Result<(), Error> {
        const ACTION: &str = "decrease the mist level";
        match self.family(ACTION)? {
            CommandFamily::Humidifier => {
                self.run(&humidifier::DECREASE, &humidifier::RESPONSE).await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn auto_mode(&mut self) -> Result<(), Error> {
        const ACTION: &str = "switch to auto mode";
        match self.family(ACTION)? {
            CommandFamily::Humidifier => {
                self.run(&humidifier::AUTO_MODE, &humidifier::RESPONSE).await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn manual_mode(&mut self) -> Result<(), Error> {
        const ACTION: &str = "switch to manual mode";
        match self.family(ACTION)? {
            CommandFamily::Humidifier => {
                self.run(&humidifier::MANUAL_MODE, &humidifier::RESPONSE).await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }
}

/// Light color and brightness.
impl<T: Transport> Device<T> {
    fn set_opcode(&self, action: &'static str) -> Result<u8, Error> {
        match self.family(action)? {
            CommandFamily::ColorBulb | CommandFamily::CeilingLight => Ok(light::SET_STATE),
            CommandFamily::StripLight => Ok(strip::SET_STATE),
            _ => Err(self.unsupported(action)),
        }
    }

    /// Brightness percent, clamped to 100.
    pub async fn set_brightness(&mut self, brightness: u8) -> Result<(), Error> {
        let opcode = self.set_opcode("set brightness")?;
        self.run(&light::set_brightness(opcode, brightness), &light::RESPONSE)
            .await
    }

    /// Color-temperature percent, clamped to 100. Strip lights have no
    /// white-spectrum channel.
    pub async fn set_color_temperature(&mut self, percent: u8) -> Result<(), Error> {
        const ACTION: &str = "set a color temperature";
        match self.family(ACTION)? {
            CommandFamily::ColorBulb | CommandFamily::CeilingLight => {
                self.run(
                    &light::set_color_temperature(light::SET_STATE, percent),
                    &light::RESPONSE,
                )
                .await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }

    /// Brightness (clamped to 100) plus an RGB color. Ceiling lights are
    /// white-only.
    pub async fn set_rgb(
        &mut self,
        brightness: u8,
        red: u8,
        green: u8,
        blue: u8,
    ) -> Result<(), Error> {
        const ACTION: &str = "set an RGB color";
        match self.family(ACTION)? {
            CommandFamily::ColorBulb => {
                self.run(
                    &light::set_rgb(light::SET_STATE, brightness, red, green, blue),
                    &light::RESPONSE,
                )
                .await
            }
            CommandFamily::StripLight => {
                self.run(
                    &light::set_rgb(strip::SET_STATE, brightness, red, green, blue),
                    &light::RESPONSE,
                )
                .await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }
}

/// Deadbolt control, both lock generations.
impl<T: Transport> Device<T> {
    pub async fn lock(&mut self) -> Result<(), Error> {
        const ACTION: &str = "lock";
        match self.family(ACTION)? {
            CommandFamily::Lock => self.run(&lock::LOCK, &lock::RESPONSE).await,
            CommandFamily::LockPro => self.run(&lock_pro::LOCK, &lock::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn unlock(&mut self) -> Result<(), Error> {
        const ACTION: &str = "unlock";
        match self.family(ACTION)? {
            CommandFamily::Lock => self.run(&lock::UNLOCK, &lock::RESPONSE).await,
            CommandFamily::LockPro => self.run(&lock_pro::UNLOCK, &lock::RESPONSE).await,
            _ => Err(self.unsupported(ACTION)),
        }
    }

    /// Unlocks the deadbolt but leaves the latch alone.
    pub async fn unlock_without_unlatch(&mut self) -> Result<(), Error> {
        const ACTION: &str = "unlock without unlatching";
        match self.family(ACTION)? {
            CommandFamily::Lock => self.run(&lock::UNLOCK_NO_UNLATCH, &lock::RESPONSE).await,
            CommandFamily::LockPro => {
                self.run(&lock_pro::UNLOCK_NO_UNLATCH, &lock::RESPONSE).await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }

    /// Queries calibration, deadbolt state, and the alarm bits.
    pub async fn info(&mut self) -> Result<LockInfo, Error> {
        const ACTION: &str = "report lock info";
        let frame: &[u8] = match self.family(ACTION)? {
            CommandFamily::Lock => &lock::INFO,
            CommandFamily::LockPro => &lock_pro::INFO,
            _ => return Err(self.unsupported(ACTION)),
        };
        let response = self.execute(frame, &lock::RESPONSE).await?;
        parse_info(&response).ok_or_else(|| Error::Protocol {
            response: HEXLOWER.encode(&response),
        })
    }

    pub async fn enable_notifications(&mut self) -> Result<(), Error> {
        const ACTION: &str = "enable notifications";
        match self.family(ACTION)? {
            CommandFamily::Lock | CommandFamily::LockPro => {
                self.run(&lock::ENABLE_NOTIFICATIONS, &lock::RESPONSE).await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }

    pub async fn disable_notifications(&mut self) -> Result<(), Error> {
        const ACTION: &str = "disable notifications";
        match self.family(ACTION)? {
            CommandFamily::Lock | CommandFamily::LockPro => {
                self.run(&lock::DISABLE_NOTIFICATIONS, &lock::RESPONSE).await
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }
}

/// Relay metering.
impl<T: Transport> Device<T> {
    /// Reads the line voltage and current, raw firmware units.
    pub async fn voltage_and_current(&mut self) -> Result<(u16, u16), Error> {
        const ACTION: &str = "read voltage and current";
        match self.family(ACTION)? {
            CommandFamily::Relay => {
                let response = self
                    .execute(&relay::READ_VOLTAGE_AND_CURRENT, &relay::RESPONSE)
                    .await?;
                relay::voltage_and_current(&response).ok_or_else(|| Error::Protocol {
                    response: HEXLOWER.encode(&response),
                })
            }
            _ => Err(self.unsupported(ACTION)),
        }
    }
}
