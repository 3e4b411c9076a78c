//! High-level driver API for the SSI PRBS rate generator
//!
//! This module provides field access by name or by [`Field`], the derived
//! `TxRate` variable, toggle commands and staged (deferred) writes on top of
//! the register block declared in [`crate::registers`].

use crate::command::{Command, ToggleState};
use crate::fields::{Base, FIELD_COUNT, Field, Mode, TX_RATE_NAME, Value};
use crate::rate::RateConfig;
use crate::registers::RateGen as RegisterDevice;
use crate::Error;

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

/// Snapshot of the polled statistics registers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    /// Missed frame counter
    pub missed: u32,
    /// Instantaneous frame rate in Hz
    pub frame_rate: u32,
    /// Highest observed frame rate
    pub frame_rate_max: u32,
    /// Lowest observed frame rate
    pub frame_rate_min: u32,
    /// Instantaneous bandwidth
    pub band_width: u64,
    /// Highest observed bandwidth
    pub band_width_max: u64,
    /// Lowest observed bandwidth
    pub band_width_min: u64,
    /// Cumulative frame count
    pub frame_count: u64,
}

/// Generator configuration applied by `configure()`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeneratorConfig {
    /// Frames per packet
    pub packet_length: u32,
    /// Frame rate in Hz (`<= 0` selects the slowest pacing)
    pub tx_rate_hz: f64,
    /// Enable continuous generation after configuring
    pub tx_enable: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            packet_length: 256,
            tx_rate_hz: 1000.0,
            tx_enable: false,
        }
    }
}

/// Main driver for the SSI PRBS rate generator
pub struct RateGenDriver<I> {
    device: RegisterDevice<I>,
    config: RateConfig,
    toggles: [ToggleState; 2],
    staged: [Option<u64>; FIELD_COUNT],
}

impl<I> RateGenDriver<I> {
    /// Create a new driver instance
    ///
    /// No bus access is performed. Toggle commands start from a last written
    /// value of 0 and nothing is staged.
    pub fn new(interface: I, config: RateConfig) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            config,
            toggles: [ToggleState::default(); 2],
            staged: [None; FIELD_COUNT],
        }
    }

    /// Rate conversion configuration
    #[must_use]
    pub const fn config(&self) -> &RateConfig {
        &self.config
    }

    /// Value staged for `field` by `set(.., commit = false)`, not yet written
    #[must_use]
    pub fn staged(&self, field: Field) -> Option<Value> {
        self.staged[field as usize].map(|raw| decode(field, raw))
    }

    /// Whether any staged value is waiting for `commit()`
    #[must_use]
    pub fn has_staged(&self) -> bool {
        self.staged.iter().any(Option::is_some)
    }

    /// Drop all staged values without writing them
    pub fn discard_staged(&mut self) {
        self.staged = [None; FIELD_COUNT];
    }

    /// Toggle state of a command
    #[must_use]
    pub const fn toggle_state(&self, cmd: Command) -> ToggleState {
        self.toggles[cmd.index()]
    }

    fn stage(&mut self, field: Field, raw: u64) {
        #[cfg(feature = "defmt")]
        defmt::trace!("staging {} = {:#x}", field, raw);

        self.staged[field as usize] = Some(raw);
    }

    /// Bookkeeping after a field value reached the hardware
    fn written(&mut self, field: Field, raw: u64) {
        self.staged[field as usize] = None;
        if let Some(cmd) = field.command() {
            self.toggles[cmd.index()].record(u8::from(raw != 0));
        }
    }
}

/// Convert a raw field value to its typed representation
fn decode(field: Field, raw: u64) -> Value {
    match field.info().base {
        Base::Bool => Value::Bool(raw != 0),
        Base::UInt => Value::UInt(raw),
    }
}

/// Validate a value for writing to `field` and return its raw encoding
fn encode<E>(field: Field, value: Value) -> Result<u64, Error<E>> {
    let info = field.info();

    if info.mode == Mode::ReadOnly {
        return Err(Error::ReadOnly(field));
    }

    let raw = match (info.base, value) {
        (Base::Bool, Value::Bool(v)) => u64::from(v),
        (Base::UInt, Value::UInt(v)) => v,
        _ => return Err(Error::TypeMismatch(field)),
    };

    if raw > info.max_value() {
        return Err(Error::OutOfRange(field));
    }

    Ok(raw)
}

/// Rate requested through `set_named("TxRate", ..)`
#[allow(clippy::cast_precision_loss)]
fn rate_value<E>(value: Value) -> Result<f64, Error<E>> {
    match value {
        Value::Float(rate) => Ok(rate),
        Value::UInt(rate) => Ok(rate as f64),
        Value::Bool(_) => Err(Error::TypeMismatch(Field::RawPeriod)),
    }
}

#[cfg(not(feature = "async"))]
impl<I> RateGenDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Read a field from the hardware
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get(&mut self, field: Field) -> Result<Value, Error<I::Error>> {
        let raw = self.read_raw(field)?;
        Ok(decode(field, raw))
    }

    /// Write a field, or stage it when `commit` is false
    ///
    /// Staged values are written by [`commit()`](Self::commit). Writing a
    /// command field records the written bit as the command's toggle state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The field is read-only
    /// - The value type does not match the field, or does not fit its width
    /// - Communication with the device fails
    pub fn set(&mut self, field: Field, value: Value, commit: bool) -> Result<(), Error<I::Error>> {
        let raw = encode(field, value)?;

        if commit {
            self.write_field(field, raw)
        } else {
            self.stage(field, raw);
            Ok(())
        }
    }

    /// Write every staged value to the hardware, in field table order
    ///
    /// On a bus error the failing field and those after it stay staged.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn commit(&mut self) -> Result<(), Error<I::Error>> {
        for field in Field::ALL {
            if let Some(raw) = self.staged[field as usize] {
                self.write_field(field, raw)?;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("staged writes committed");

        Ok(())
    }

    /// Read the transmit rate in Hz
    ///
    /// Computed from the current hardware `RawPeriod`:
    /// `clock_freq / (RawPeriod + 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn get_rate(&mut self) -> Result<f64, Error<I::Error>> {
        let period = self.device.raw_period().read()?.raw_period();
        Ok(self.config.rate_from_period(period))
    }

    /// Set the transmit rate in Hz
    ///
    /// Performs exactly one `RawPeriod` write (or stages one when `commit`
    /// is false). Rates `<= 0` select `0xFFFF_FFFF`; out of range rates clamp.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_rate(&mut self, rate_hz: f64, commit: bool) -> Result<(), Error<I::Error>> {
        let period = self.config.period_from_rate(rate_hz);

        #[cfg(feature = "defmt")]
        defmt::debug!("tx rate {} Hz -> raw period {}", rate_hz, period);

        self.set(Field::RawPeriod, Value::UInt(u64::from(period)), commit)
    }

    /// Read a field or `TxRate` by name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or communication fails.
    pub fn get_named(&mut self, name: &str) -> Result<Value, Error<I::Error>> {
        if name == TX_RATE_NAME {
            return Ok(Value::Float(self.get_rate()?));
        }

        let field = name.parse::<Field>().map_err(|_| Error::UnknownVariable)?;
        self.get(field)
    }

    /// Write a field or `TxRate` by name
    ///
    /// `TxRate` accepts `Float` or `UInt` values.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown, the value is rejected (see
    /// [`set()`](Self::set)) or communication fails.
    pub fn set_named(
        &mut self,
        name: &str,
        value: Value,
        commit: bool,
    ) -> Result<(), Error<I::Error>> {
        if name == TX_RATE_NAME {
            let rate = rate_value(value)?;
            return self.set_rate(rate, commit);
        }

        let field = name.parse::<Field>().map_err(|_| Error::UnknownVariable)?;
        self.set(field, value, commit)
    }

    /// Invoke a toggle command
    ///
    /// Writes the complement of the command's last written bit.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails. The toggle
    /// state is left unchanged in that case.
    pub fn toggle(&mut self, cmd: Command) -> Result<(), Error<I::Error>> {
        let bit = self.toggles[cmd.index()].next();

        #[cfg(feature = "defmt")]
        defmt::debug!("{} <- {}", cmd, bit);

        self.write_field(cmd.field(), u64::from(bit))
    }

    /// Pulse a command field high then low
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn pulse(&mut self, cmd: Command) -> Result<(), Error<I::Error>> {
        self.write_field(cmd.field(), 1)?;
        self.write_field(cmd.field(), 0)
    }

    /// Toggle the statistics reset
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn stat_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.toggle(Command::StatReset)
    }

    /// Toggle the one-shot burst trigger
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn one_shot(&mut self) -> Result<(), Error<I::Error>> {
        self.toggle(Command::OneShot)
    }

    /// Enable or disable continuous generation
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_tx_enable(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.write_field(Field::TxEn, u64::from(enable))
    }

    /// Whether continuous generation is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn tx_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.control().read()?.tx_en())
    }

    /// Read the packet length in frames
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn packet_length(&mut self) -> Result<u32, Error<I::Error>> {
        Ok(self.device.packet_length().read()?.packet_length())
    }

    /// Set the packet length in frames
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_packet_length(&mut self, length: u32) -> Result<(), Error<I::Error>> {
        self.write_field(Field::PacketLength, u64::from(length))
    }

    /// Apply a generator configuration
    ///
    /// Writes the packet length, then the rate, then the enable bit, so the
    /// generator never runs with a partially applied configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure(&mut self, config: GeneratorConfig) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("configuring generator: {}", config);

        self.set_packet_length(config.packet_length)?;
        self.set_rate(config.tx_rate_hz, true)?;
        self.set_tx_enable(config.tx_enable)
    }

    /// Read every polled statistics register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_statistics(&mut self) -> Result<Statistics, Error<I::Error>> {
        Ok(Statistics {
            missed: self.device.missed().read()?.missed(),
            frame_rate: self.device.frame_rate().read()?.frame_rate(),
            frame_rate_max: self.device.frame_rate_max().read()?.frame_rate_max(),
            frame_rate_min: self.device.frame_rate_min().read()?.frame_rate_min(),
            band_width: self.device.band_width().read()?.band_width(),
            band_width_max: self.device.band_width_max().read()?.band_width_max(),
            band_width_min: self.device.band_width_min().read()?.band_width_min(),
            frame_count: self.device.frame_count().read()?.frame_count(),
        })
    }

    fn read_raw(&mut self, field: Field) -> Result<u64, Error<I::Error>> {
        let raw = match field {
            Field::StatReset => u64::from(self.device.stat_reset().read()?.stat_reset()),
            Field::PacketLength => u64::from(self.device.packet_length().read()?.packet_length()),
            Field::RawPeriod => u64::from(self.device.raw_period().read()?.raw_period()),
            Field::TxEn => u64::from(self.device.control().read()?.tx_en()),
            Field::OneShot => u64::from(self.device.control().read()?.one_shot()),
            Field::Missed => u64::from(self.device.missed().read()?.missed()),
            Field::FrameRate => u64::from(self.device.frame_rate().read()?.frame_rate()),
            Field::FrameRateMax => u64::from(self.device.frame_rate_max().read()?.frame_rate_max()),
            Field::FrameRateMin => u64::from(self.device.frame_rate_min().read()?.frame_rate_min()),
            Field::BandWidth => self.device.band_width().read()?.band_width(),
            Field::BandWidthMax => self.device.band_width_max().read()?.band_width_max(),
            Field::BandWidthMin => self.device.band_width_min().read()?.band_width_min(),
            Field::FrameCount => self.device.frame_count().read()?.frame_count(),
        };
        Ok(raw)
    }

    /// Write an already validated raw value
    #[allow(clippy::cast_possible_truncation)]
    fn write_field(&mut self, field: Field, raw: u64) -> Result<(), Error<I::Error>> {
        match field {
            Field::StatReset => self.device.stat_reset().write(|w| {
                w.set_stat_reset(raw as u8);
            })?,
            Field::PacketLength => self.device.packet_length().write(|w| {
                w.set_packet_length(raw as u32);
            })?,
            Field::RawPeriod => self.device.raw_period().write(|w| {
                w.set_raw_period(raw as u32);
            })?,
            // TxEn and OneShot share the control word
            Field::TxEn => self.device.control().modify(|w| {
                w.set_tx_en(raw != 0);
            })?,
            Field::OneShot => self.device.control().modify(|w| {
                w.set_one_shot(raw as u8);
            })?,
            _ => return Err(Error::ReadOnly(field)),
        }

        self.written(field, raw);
        Ok(())
    }
}

#[cfg(feature = "async")]
impl<I> RateGenDriver<I>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
{
    /// Read a field from the hardware
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get(&mut self, field: Field) -> Result<Value, Error<I::Error>> {
        let raw = self.read_raw(field).await?;
        Ok(decode(field, raw))
    }

    /// Write a field, or stage it when `commit` is false
    ///
    /// Staged values are written by [`commit()`](Self::commit). Writing a
    /// command field records the written bit as the command's toggle state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The field is read-only
    /// - The value type does not match the field, or does not fit its width
    /// - Communication with the device fails
    pub async fn set(
        &mut self,
        field: Field,
        value: Value,
        commit: bool,
    ) -> Result<(), Error<I::Error>> {
        let raw = encode(field, value)?;

        if commit {
            self.write_field(field, raw).await
        } else {
            self.stage(field, raw);
            Ok(())
        }
    }

    /// Write every staged value to the hardware, in field table order
    ///
    /// On a bus error the failing field and those after it stay staged.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn commit(&mut self) -> Result<(), Error<I::Error>> {
        for field in Field::ALL {
            if let Some(raw) = self.staged[field as usize] {
                self.write_field(field, raw).await?;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("staged writes committed");

        Ok(())
    }

    /// Read the transmit rate in Hz
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn get_rate(&mut self) -> Result<f64, Error<I::Error>> {
        let period = self.device.raw_period().read_async().await?.raw_period();
        Ok(self.config.rate_from_period(period))
    }

    /// Set the transmit rate in Hz
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_rate(&mut self, rate_hz: f64, commit: bool) -> Result<(), Error<I::Error>> {
        let period = self.config.period_from_rate(rate_hz);

        #[cfg(feature = "defmt")]
        defmt::debug!("tx rate {} Hz -> raw period {}", rate_hz, period);

        self.set(Field::RawPeriod, Value::UInt(u64::from(period)), commit)
            .await
    }

    /// Read a field or `TxRate` by name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or communication fails.
    pub async fn get_named(&mut self, name: &str) -> Result<Value, Error<I::Error>> {
        if name == TX_RATE_NAME {
            return Ok(Value::Float(self.get_rate().await?));
        }

        let field = name.parse::<Field>().map_err(|_| Error::UnknownVariable)?;
        self.get(field).await
    }

    /// Write a field or `TxRate` by name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown, the value is rejected or
    /// communication fails.
    pub async fn set_named(
        &mut self,
        name: &str,
        value: Value,
        commit: bool,
    ) -> Result<(), Error<I::Error>> {
        if name == TX_RATE_NAME {
            let rate = rate_value(value)?;
            return self.set_rate(rate, commit).await;
        }

        let field = name.parse::<Field>().map_err(|_| Error::UnknownVariable)?;
        self.set(field, value, commit).await
    }

    /// Invoke a toggle command
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn toggle(&mut self, cmd: Command) -> Result<(), Error<I::Error>> {
        let bit = self.toggles[cmd.index()].next();

        #[cfg(feature = "defmt")]
        defmt::debug!("{} <- {}", cmd, bit);

        self.write_field(cmd.field(), u64::from(bit)).await
    }

    /// Pulse a command field high then low
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn pulse(&mut self, cmd: Command) -> Result<(), Error<I::Error>> {
        self.write_field(cmd.field(), 1).await?;
        self.write_field(cmd.field(), 0).await
    }

    /// Toggle the statistics reset
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn stat_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.toggle(Command::StatReset).await
    }

    /// Toggle the one-shot burst trigger
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn one_shot(&mut self) -> Result<(), Error<I::Error>> {
        self.toggle(Command::OneShot).await
    }

    /// Enable or disable continuous generation
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_tx_enable(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.write_field(Field::TxEn, u64::from(enable)).await
    }

    /// Whether continuous generation is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn tx_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.device.control().read_async().await?.tx_en())
    }

    /// Read the packet length in frames
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn packet_length(&mut self) -> Result<u32, Error<I::Error>> {
        Ok(self
            .device
            .packet_length()
            .read_async()
            .await?
            .packet_length())
    }

    /// Set the packet length in frames
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_packet_length(&mut self, length: u32) -> Result<(), Error<I::Error>> {
        self.write_field(Field::PacketLength, u64::from(length))
            .await
    }

    /// Apply a generator configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn configure(&mut self, config: GeneratorConfig) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("configuring generator: {}", config);

        self.set_packet_length(config.packet_length).await?;
        self.set_rate(config.tx_rate_hz, true).await?;
        self.set_tx_enable(config.tx_enable).await
    }

    /// Read every polled statistics register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_statistics(&mut self) -> Result<Statistics, Error<I::Error>> {
        Ok(Statistics {
            missed: self.device.missed().read_async().await?.missed(),
            frame_rate: self.device.frame_rate().read_async().await?.frame_rate(),
            frame_rate_max: self
                .device
                .frame_rate_max()
                .read_async()
                .await?
                .frame_rate_max(),
            frame_rate_min: self
                .device
                .frame_rate_min()
                .read_async()
                .await?
                .frame_rate_min(),
            band_width: self.device.band_width().read_async().await?.band_width(),
            band_width_max: self
                .device
                .band_width_max()
                .read_async()
                .await?
                .band_width_max(),
            band_width_min: self
                .device
                .band_width_min()
                .read_async()
                .await?
                .band_width_min(),
            frame_count: self.device.frame_count().read_async().await?.frame_count(),
        })
    }

    async fn read_raw(&mut self, field: Field) -> Result<u64, Error<I::Error>> {
        let d = &mut self.device;
        let raw = match field {
            Field::StatReset => u64::from(d.stat_reset().read_async().await?.stat_reset()),
            Field::PacketLength => {
                u64::from(d.packet_length().read_async().await?.packet_length())
            }
            Field::RawPeriod => u64::from(d.raw_period().read_async().await?.raw_period()),
            Field::TxEn => u64::from(d.control().read_async().await?.tx_en()),
            Field::OneShot => u64::from(d.control().read_async().await?.one_shot()),
            Field::Missed => u64::from(d.missed().read_async().await?.missed()),
            Field::FrameRate => u64::from(d.frame_rate().read_async().await?.frame_rate()),
            Field::FrameRateMax => {
                u64::from(d.frame_rate_max().read_async().await?.frame_rate_max())
            }
            Field::FrameRateMin => {
                u64::from(d.frame_rate_min().read_async().await?.frame_rate_min())
            }
            Field::BandWidth => d.band_width().read_async().await?.band_width(),
            Field::BandWidthMax => d.band_width_max().read_async().await?.band_width_max(),
            Field::BandWidthMin => d.band_width_min().read_async().await?.band_width_min(),
            Field::FrameCount => d.frame_count().read_async().await?.frame_count(),
        };
        Ok(raw)
    }

    /// Write an already validated raw value
    #[allow(clippy::cast_possible_truncation)]
    async fn write_field(&mut self, field: Field, raw: u64) -> Result<(), Error<I::Error>> {
        let d = &mut self.device;
        match field {
            Field::StatReset => {
                d.stat_reset()
                    .write_async(|w| {
                        w.set_stat_reset(raw as u8);
                    })
                    .await?;
            }
            Field::PacketLength => {
                d.packet_length()
                    .write_async(|w| {
                        w.set_packet_length(raw as u32);
                    })
                    .await?;
            }
            Field::RawPeriod => {
                d.raw_period()
                    .write_async(|w| {
                        w.set_raw_period(raw as u32);
                    })
                    .await?;
            }
            Field::TxEn => {
                d.control()
                    .modify_async(|w| {
                        w.set_tx_en(raw != 0);
                    })
                    .await?;
            }
            Field::OneShot => {
                d.control()
                    .modify_async(|w| {
                        w.set_one_shot(raw as u8);
                    })
                    .await?;
            }
            _ => return Err(Error::ReadOnly(field)),
        }

        self.written(field, raw);
        Ok(())
    }
}
