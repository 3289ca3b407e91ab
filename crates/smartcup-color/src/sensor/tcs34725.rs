//! TCS34725 RGBC sensor driver
//!
//! Register access goes through the command byte: bit 7 selects the command
//! register, bits 6..5 the transaction type (repeated byte or auto-increment)
//! and bits 4..0 the register address or special function.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::ColorSensor;
use crate::sample::RawChannels;

/// Fixed I2C address
pub const ADDRESS: u8 = 0x29;

const COMMAND_BIT: u8 = 0x80;
const AUTO_INCREMENT: u8 = 0x20;
/// Special function: clear channel interrupt
const CLEAR_INTERRUPT: u8 = COMMAND_BIT | 0x66;

/// IDs reported by the TCS3472x family
const VALID_IDS: [u8; 3] = [0x44, 0x4D, 0x10];

/// Wait after PON before enabling the ADC
const POWER_ON_DELAY_MS: u32 = 3;

mod reg {
    pub(super) const ENABLE: u8 = 0x00;
    pub(super) const ATIME: u8 = 0x01;
    pub(super) const AILTL: u8 = 0x04;
    pub(super) const PERS: u8 = 0x0C;
    pub(super) const CONTROL: u8 = 0x0F;
    pub(super) const ID: u8 = 0x12;
    pub(super) const CDATAL: u8 = 0x14;
}

mod enable {
    /// Oscillator on
    pub(super) const PON: u8 = 0x01;
    /// RGBC ADC on
    pub(super) const AEN: u8 = 0x02;
    /// RGBC interrupt output on
    pub(super) const AIEN: u8 = 0x10;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tcs34725Error<E> {
    /// I2C transaction failed
    Bus(E),
    /// The device answered with an unknown ID
    InvalidId(u8),
}

/// RGBC integration time, encoded as the ATIME register value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntegrationTime {
    Ms2_4 = 0xFF,
    Ms24 = 0xF6,
    Ms50 = 0xEB,
    Ms101 = 0xD5,
    Ms154 = 0xC0,
    Ms614 = 0x00,
}

impl IntegrationTime {
    /// Length of one integration cycle, rounded up
    pub const fn millis(self) -> u32 {
        (256 - self as u32) * 12 / 5 + 1
    }
}

/// Analog gain, encoded as the CONTROL register value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gain {
    X1 = 0x00,
    X4 = 0x01,
    X16 = 0x02,
    X60 = 0x03,
}

/// TCS34725 on an async I2C bus
pub struct Tcs34725<I2C, D> {
    i2c: I2C,
    delay: D,
    integration_time: IntegrationTime,
    gain: Gain,
}

impl<I2C: I2c, D: DelayNs> Tcs34725<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            integration_time: IntegrationTime::Ms154,
            gain: Gain::X4,
        }
    }

    #[must_use]
    pub fn with_integration_time(mut self, integration_time: IntegrationTime) -> Self {
        self.integration_time = integration_time;
        self
    }

    #[must_use]
    pub fn with_gain(mut self, gain: Gain) -> Self {
        self.gain = gain;
        self
    }

    pub fn integration_time(&self) -> IntegrationTime {
        self.integration_time
    }

    /// Check the device ID, program timing and gain, and power up
    pub async fn init(&mut self) -> Result<(), Tcs34725Error<I2C::Error>> {
        let id = self.read_register(reg::ID).await?;
        if !VALID_IDS.contains(&id) {
            return Err(Tcs34725Error::InvalidId(id));
        }

        self.write_register(reg::ATIME, self.integration_time as u8)
            .await?;
        self.write_register(reg::CONTROL, self.gain as u8).await?;
        // Interrupt on every completed cycle
        self.write_register(reg::PERS, 0x00).await?;

        self.power_on().await
    }

    /// Give back the bus and the delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    async fn power_on(&mut self) -> Result<(), Tcs34725Error<I2C::Error>> {
        let current = self.read_register(reg::ENABLE).await?;
        self.write_register(reg::ENABLE, current | enable::PON)
            .await?;
        self.delay.delay_ms(POWER_ON_DELAY_MS).await;
        self.write_register(reg::ENABLE, current | enable::PON | enable::AEN)
            .await?;
        // First integration cycle has to complete before data is valid
        self.delay.delay_ms(self.integration_time.millis()).await;
        Ok(())
    }

    async fn update_enable(&mut self, set: u8, clear: u8) -> Result<(), Tcs34725Error<I2C::Error>> {
        let current = self.read_register(reg::ENABLE).await?;
        self.write_register(reg::ENABLE, (current & !clear) | set)
            .await
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Tcs34725Error<I2C::Error>> {
        self.i2c
            .write(ADDRESS, &[COMMAND_BIT | register, value])
            .await
            .map_err(Tcs34725Error::Bus)
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, Tcs34725Error<I2C::Error>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[COMMAND_BIT | register], &mut buffer)
            .await
            .map_err(Tcs34725Error::Bus)?;
        Ok(buffer[0])
    }
}

impl<I2C: I2c, D: DelayNs> ColorSensor for Tcs34725<I2C, D> {
    type Error = Tcs34725Error<I2C::Error>;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        self.power_on().await
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        self.update_enable(0, enable::PON | enable::AEN).await
    }

    async fn set_interrupt(&mut self, enabled: bool) -> Result<(), Self::Error> {
        if enabled {
            self.update_enable(enable::AIEN, 0).await
        } else {
            self.update_enable(0, enable::AIEN).await
        }
    }

    async fn clear_interrupt(&mut self) -> Result<(), Self::Error> {
        self.i2c
            .write(ADDRESS, &[CLEAR_INTERRUPT])
            .await
            .map_err(Tcs34725Error::Bus)
    }

    async fn set_interrupt_limits(&mut self, low: u16, high: u16) -> Result<(), Self::Error> {
        let [low_l, low_h] = low.to_le_bytes();
        let [high_l, high_h] = high.to_le_bytes();
        self.i2c
            .write(
                ADDRESS,
                &[COMMAND_BIT | AUTO_INCREMENT | reg::AILTL, low_l, low_h, high_l, high_h],
            )
            .await
            .map_err(Tcs34725Error::Bus)
    }

    async fn read_raw(&mut self) -> Result<RawChannels, Self::Error> {
        let mut data = [0u8; 8];
        self.i2c
            .write_read(ADDRESS, &[COMMAND_BIT | AUTO_INCREMENT | reg::CDATAL], &mut data)
            .await
            .map_err(Tcs34725Error::Bus)?;

        Ok(RawChannels {
            c: u16::from_le_bytes([data[0], data[1]]),
            r: u16::from_le_bytes([data[2], data[3]]),
            g: u16::from_le_bytes([data[4], data[5]]),
            b: u16::from_le_bytes([data[6], data[7]]),
        })
    }
}
