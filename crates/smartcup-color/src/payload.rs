//! JSON payload handed to the Bluetooth notifier

use heapless::String;
use serde::Serialize;

/// Enough for `{"r":255,"g":255,"b":255,"c":65535}` with room to spare
pub const PAYLOAD_CAPACITY: usize = 64;

pub type PayloadString = String<PAYLOAD_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Serialized payload does not fit the buffer
    Overflow,
}

/// One color sample as published to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SamplePayload {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub c: u16,
}

impl SamplePayload {
    /// Build from observer arguments, which carry whole numbers as `f32`
    pub fn from_observed(r: f32, g: f32, b: f32, c: f32) -> Self {
        Self {
            r: r as u8,
            g: g as u8,
            b: b as u8,
            c: c as u16,
        }
    }

    pub fn to_json(&self) -> Result<PayloadString, PayloadError> {
        serde_json_core::to_string(self).map_err(|_| PayloadError::Overflow)
    }
}
