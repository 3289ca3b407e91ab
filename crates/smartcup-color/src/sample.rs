//! Values flowing through one analysis cycle
//!
//! `RawChannels` → `RawSample` → `NormalizedSample` → `CorrectedColor`,
//! bundled together in a [`ColorReading`] once the cycle completes.

use embassy_time::Instant;

/// Four raw 16-bit channel counts as read from the sensor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawChannels {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    /// Unfiltered (clear) channel, used only as a drift benchmark
    pub c: u16,
}

impl RawChannels {
    pub const fn new(r: u16, g: u16, b: u16, c: u16) -> Self {
        Self { r, g, b, c }
    }
}

/// Raw channels stamped with the monotonic time of capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub channels: RawChannels,
    pub captured_at: Instant,
}

impl RawSample {
    pub const fn new(channels: RawChannels, captured_at: Instant) -> Self {
        Self {
            channels,
            captured_at,
        }
    }
}

/// Calibrated reflectance fractions in `[0, 1]`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NormalizedSample {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Display-ready 8-bit color
///
/// This is the terminal value of the pipeline: it is what gets drawn and
/// what is handed to a registered observer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrectedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CorrectedColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn is_achromatic(&self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

/// Everything produced by one completed cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorReading {
    pub raw: RawSample,
    pub normalized: NormalizedSample,
    pub color: CorrectedColor,
}
