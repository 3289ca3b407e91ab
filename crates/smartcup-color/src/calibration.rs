//! Sensor calibration
//!
//! A calibration holds, for every channel, the raw reading taken over a
//! black reference card and over a white one. Both are measured by hand and
//! supplied at compile time.

use crate::normalize::normalize;
use crate::sample::{NormalizedSample, RawChannels};

/// Sensor channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Clear,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Clear];

    pub const fn label(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
            Channel::Clear => 'C',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// The black point is not below the white point
    InvertedChannel(Channel),
}

/// Black and white reference points of a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCalibration {
    pub black: u16,
    pub white: u16,
}

impl ChannelCalibration {
    pub const fn new(black: u16, white: u16) -> Self {
        Self { black, white }
    }

    pub const fn is_ordered(&self) -> bool {
        self.black < self.white
    }

    /// Map a raw count to a `[0, 1]` fraction
    #[inline]
    pub fn normalize(&self, raw: u16) -> f32 {
        normalize(raw, self.black, self.white)
    }
}

/// Calibration of all four sensor channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub red: ChannelCalibration,
    pub green: ChannelCalibration,
    pub blue: ChannelCalibration,
    /// Not used for the color; kept to watch the sensor drift
    pub clear: ChannelCalibration,
}

impl Calibration {
    pub const fn new(
        red: ChannelCalibration,
        green: ChannelCalibration,
        blue: ChannelCalibration,
        clear: ChannelCalibration,
    ) -> Self {
        Self {
            red,
            green,
            blue,
            clear,
        }
    }

    pub const fn channel(&self, channel: Channel) -> ChannelCalibration {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
            Channel::Clear => self.clear,
        }
    }

    /// Check that every channel has its black point below its white point
    pub fn validate(&self) -> Result<(), CalibrationError> {
        match Channel::ALL
            .into_iter()
            .find(|channel| !self.channel(*channel).is_ordered())
        {
            Some(channel) => Err(CalibrationError::InvertedChannel(channel)),
            None => Ok(()),
        }
    }

    /// Normalize the color channels of a raw reading. The clear channel is
    /// left out.
    pub fn normalize(&self, raw: &RawChannels) -> NormalizedSample {
        NormalizedSample {
            r: self.red.normalize(raw.r),
            g: self.green.normalize(raw.g),
            b: self.blue.normalize(raw.b),
        }
    }
}
