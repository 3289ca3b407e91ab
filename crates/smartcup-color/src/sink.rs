//! Sample sink - output boundary of the pipeline
//!
//! A finished reading either goes to the display (channel labels plus a
//! swatch of the detected color) or to a registered observer. Headless
//! operation suppresses all drawing.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::mono_font::ascii::FONT_9X15;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, Point, Primitive, RgbColor, Size};
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use heapless::String;

use crate::display::FrameDisplay;
use crate::normalize::fraction_to_byte;
use crate::sample::ColorReading;

const LABEL_X: i32 = 20;
const RED_LABEL_Y: i32 = 48;
const GREEN_LABEL_Y: i32 = 73;
const BLUE_LABEL_Y: i32 = 98;
const CLEAR_LABEL_Y: i32 = 123;
const CAPTION_Y: i32 = 153;
const CAPTION: &str = "Detected Color:";

/// Swatch covers the bottom band of the 240x240 panel
const SWATCH_ORIGIN: Point = Point::new(0, 180);
const SWATCH_SIZE: Size = Size::new(240, 60);

const LABEL_CAPACITY: usize = 32;

/// Plain function callback with `(r, g, b, c)`
pub type SampleCallback = fn(f32, f32, f32, f32);

/// Receives every completed sample
pub trait SampleObserver {
    /// `r`, `g`, `b` are the corrected channel bytes, `c` the raw clear count
    fn on_sample(&mut self, r: f32, g: f32, b: f32, c: f32);
}

impl SampleObserver for SampleCallback {
    fn on_sample(&mut self, r: f32, g: f32, b: f32, c: f32) {
        (*self)(r, g, b, c);
    }
}

/// Where completed samples go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Labels and swatch on the display
    Display,
    /// Registered observer only, no drawing
    Callback,
}

/// Which values the channel labels show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Gamma and saturation corrected bytes
    Corrected,
    /// Normalized fractions scaled to bytes, no correction
    Normalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub mode: OutputMode,
    /// Suppresses every draw call, whatever the mode
    pub headless: bool,
    pub labels: LabelMode,
}

impl OutputConfig {
    pub const DEFAULT: Self = Self {
        mode: OutputMode::Display,
        headless: false,
        labels: LabelMode::Corrected,
    };
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub struct SampleSink<D, O = SampleCallback> {
    display: D,
    observer: Option<O>,
    mode: OutputMode,
    headless: bool,
    labels: LabelMode,
}

impl<D: FrameDisplay> SampleSink<D, SampleCallback> {
    pub fn new(display: D, config: &OutputConfig) -> Self {
        Self {
            display,
            observer: None,
            mode: config.mode,
            headless: config.headless,
            labels: config.labels,
        }
    }
}

impl<D: FrameDisplay, O: SampleObserver> SampleSink<D, O> {
    /// Replace the observer, changing its type
    pub fn with_observer<P: SampleObserver>(self, observer: P) -> SampleSink<D, P> {
        SampleSink {
            display: self.display,
            observer: Some(observer),
            mode: self.mode,
            headless: self.headless,
            labels: self.labels,
        }
    }

    pub fn set_observer(&mut self, observer: O) {
        self.observer = Some(observer);
    }

    pub fn observer(&self) -> Option<&O> {
        self.observer.as_ref()
    }

    pub fn set_headless(&mut self, headless: bool) {
        self.headless = headless;
    }

    pub fn set_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Deliver one completed reading
    pub fn emit(&mut self, reading: &ColorReading) -> Result<(), D::Error> {
        match self.mode {
            OutputMode::Callback => {
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_sample(
                        f32::from(reading.color.r),
                        f32::from(reading.color.g),
                        f32::from(reading.color.b),
                        f32::from(reading.raw.channels.c),
                    );
                }
                Ok(())
            }
            OutputMode::Display if self.headless => Ok(()),
            OutputMode::Display => self.render(reading),
        }
    }

    fn render(&mut self, reading: &ColorReading) -> Result<(), D::Error> {
        let raw = reading.raw.channels;
        let (r, g, b) = match self.labels {
            LabelMode::Corrected => (reading.color.r, reading.color.g, reading.color.b),
            LabelMode::Normalized => (
                fraction_to_byte(reading.normalized.r),
                fraction_to_byte(reading.normalized.g),
                fraction_to_byte(reading.normalized.b),
            ),
        };

        self.display.clear(Rgb565::WHITE)?;

        let mut label: String<LABEL_CAPACITY> = String::new();
        // Overlong labels are cut, never fail the frame
        let _ = write!(label, "R: {:3} = {:4} raw", r, raw.r);
        self.draw_label(&label, RED_LABEL_Y, Rgb565::RED)?;

        label.clear();
        let _ = write!(label, "G: {:3} = {:4} raw", g, raw.g);
        self.draw_label(&label, GREEN_LABEL_Y, Rgb565::GREEN)?;

        label.clear();
        let _ = write!(label, "B: {:3} = {:4} raw", b, raw.b);
        self.draw_label(&label, BLUE_LABEL_Y, Rgb565::BLUE)?;

        label.clear();
        let _ = write!(label, "C: {:5}", raw.c);
        self.draw_label(&label, CLEAR_LABEL_Y, Rgb565::BLACK)?;

        self.draw_label(CAPTION, CAPTION_Y, Rgb565::BLACK)?;

        Rectangle::new(SWATCH_ORIGIN, SWATCH_SIZE)
            .into_styled(PrimitiveStyle::with_fill(Rgb565::from(reading.color)))
            .draw(&mut self.display)?;

        self.display.flush()
    }

    fn draw_label(&mut self, text: &str, y: i32, color: Rgb565) -> Result<(), D::Error> {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_9X15)
            .text_color(color)
            .background_color(Rgb565::WHITE)
            .build();
        Text::with_baseline(text, Point::new(LABEL_X, y), style, Baseline::Top)
            .draw(&mut self.display)?;
        Ok(())
    }
}
