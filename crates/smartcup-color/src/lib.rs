#![no_std]

//! Color sensing pipeline - acquisition and correction
//!
//! Architecture layers:
//! - `calibration` - Per-channel black/white reference points
//! - `normalize` - Raw count to reflectance fraction
//! - `correction` - Gamma curve and HSV saturation boost
//! - `rgb565` - Packing into the 16-bit display color word
//! - `sensor` - Hardware abstraction ([`ColorSensor`] trait) and the TCS34725 driver
//! - `acquisition` - Timed LED/interrupt measurement protocol
//! - `sink` - Output boundary (display swatch or sample observer)
//! - `analyzer` - One complete analysis cycle, start to finish
//!
//! Everything hardware facing is generic over `embedded-hal` traits, so the
//! same code runs on the board and against fakes on the host.

#[macro_use]
mod fmt;

pub mod acquisition;
pub mod analyzer;
pub mod calibration;
pub mod correction;
pub mod display;
pub mod normalize;
pub mod payload;
pub mod rgb565;
pub mod sample;
pub mod sensor;
pub mod sink;

pub use acquisition::{
    AcquisitionController, AcquisitionError, AcquisitionPhase, AcquisitionTimings, Clock,
};
pub use analyzer::{AnalysisError, ColorAnalyzer, CorrectionPipeline};
pub use calibration::{Calibration, CalibrationError, Channel, ChannelCalibration};
pub use correction::{DEFAULT_SATURATION_BOOST, Hsv, boost_saturation, gamma_correct};
pub use display::{FrameBuffer, FrameDisplay};
pub use normalize::{fraction_to_byte, normalize};
pub use payload::{PAYLOAD_CAPACITY, PayloadError, PayloadString, SamplePayload};
pub use rgb565::{pack_rgb565, unpack_rgb565};
pub use sample::{ColorReading, CorrectedColor, NormalizedSample, RawChannels, RawSample};
pub use sensor::{ColorSensor, Gain, IntegrationTime, TCS34725_ADDRESS, Tcs34725, Tcs34725Error};
pub use sink::{LabelMode, OutputConfig, OutputMode, SampleCallback, SampleObserver, SampleSink};
