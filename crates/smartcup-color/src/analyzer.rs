//! Color analyzer - one complete analysis cycle
//!
//! The analyzer is the single entry point an external scheduler calls once
//! per tick. It runs the acquisition protocol, pushes the raw sample through
//! normalization and correction, and hands the result to the sink.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::acquisition::{AcquisitionController, AcquisitionError, Clock};
use crate::calibration::{Calibration, CalibrationError};
use crate::correction::{DEFAULT_SATURATION_BOOST, boost_saturation, gamma_correct};
use crate::display::FrameDisplay;
use crate::sample::{ColorReading, CorrectedColor, RawSample};
use crate::sensor::ColorSensor;
use crate::sink::{SampleObserver, SampleSink};

#[derive(Debug)]
pub enum AnalysisError<E> {
    /// No sample this cycle
    Acquisition(AcquisitionError),
    /// The sample was produced but could not be drawn
    Display(E),
}

impl<E> From<AcquisitionError> for AnalysisError<E> {
    fn from(err: AcquisitionError) -> Self {
        AnalysisError::Acquisition(err)
    }
}

/// Raw sample to display color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionPipeline {
    calibration: Calibration,
    saturation_boost: f32,
}

impl CorrectionPipeline {
    /// Create a pipeline, rejecting calibrations with a black point at or
    /// above the white point
    pub fn new(calibration: Calibration) -> Result<Self, CalibrationError> {
        calibration.validate()?;
        Ok(Self {
            calibration,
            saturation_boost: DEFAULT_SATURATION_BOOST,
        })
    }

    #[must_use]
    pub fn with_saturation_boost(mut self, factor: f32) -> Self {
        self.saturation_boost = factor;
        self
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn process(&self, raw: RawSample) -> ColorReading {
        let normalized = self.calibration.normalize(&raw.channels);
        let gamma = CorrectedColor {
            r: gamma_correct(normalized.r),
            g: gamma_correct(normalized.g),
            b: gamma_correct(normalized.b),
        };

        ColorReading {
            raw,
            normalized,
            color: boost_saturation(gamma, self.saturation_boost),
        }
    }
}

pub struct ColorAnalyzer<S, L, I, T, C, D, O> {
    acquisition: AcquisitionController<S, L, I, T, C>,
    pipeline: CorrectionPipeline,
    sink: SampleSink<D, O>,
}

impl<S, L, I, T, C, D, O> ColorAnalyzer<S, L, I, T, C, D, O>
where
    S: ColorSensor,
    L: OutputPin,
    I: InputPin,
    T: DelayNs,
    C: Clock,
    D: FrameDisplay,
    O: SampleObserver,
{
    pub fn new(
        acquisition: AcquisitionController<S, L, I, T, C>,
        pipeline: CorrectionPipeline,
        sink: SampleSink<D, O>,
    ) -> Self {
        Self {
            acquisition,
            pipeline,
            sink,
        }
    }

    /// Prepare the LED and the sensor interrupt
    pub async fn begin(&mut self) {
        self.acquisition.initialize().await;
    }

    /// Run one cycle: acquire, correct, emit
    pub async fn run_analysis(&mut self) -> Result<ColorReading, AnalysisError<D::Error>> {
        let raw = self.acquisition.run_cycle().await?;
        let reading = self.pipeline.process(raw);
        self.sink
            .emit(&reading)
            .map_err(AnalysisError::Display)?;
        Ok(reading)
    }

    pub fn acquisition(&self) -> &AcquisitionController<S, L, I, T, C> {
        &self.acquisition
    }

    pub fn sink_mut(&mut self) -> &mut SampleSink<D, O> {
        &mut self.sink
    }

    pub fn sink(&self) -> &SampleSink<D, O> {
        &self.sink
    }
}
