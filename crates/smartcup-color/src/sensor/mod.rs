//! Color sensor abstraction layer
//!
//! Provides a trait-based abstraction over the color sensor, allowing the
//! acquisition protocol to be hardware-agnostic.

mod tcs34725;

pub use tcs34725::{ADDRESS as TCS34725_ADDRESS, Gain, IntegrationTime, Tcs34725, Tcs34725Error};

use crate::sample::RawChannels;

/// Abstract RGBC color sensor with a threshold interrupt output
///
/// Implement this trait to support a different sensor. The acquisition
/// controller is generic over it.
#[allow(async_fn_in_trait)]
pub trait ColorSensor {
    type Error: core::fmt::Debug;

    /// Power up and start integrating
    async fn enable(&mut self) -> Result<(), Self::Error>;

    /// Stop integrating and power down
    async fn disable(&mut self) -> Result<(), Self::Error>;

    /// Enable or disable the interrupt output
    async fn set_interrupt(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Clear a pending interrupt
    async fn clear_interrupt(&mut self) -> Result<(), Self::Error>;

    /// Set the clear-channel window outside of which the interrupt fires
    async fn set_interrupt_limits(&mut self, low: u16, high: u16) -> Result<(), Self::Error>;

    /// Read all four channels in one transaction
    async fn read_raw(&mut self) -> Result<RawChannels, Self::Error>;
}
