//! Host-side fakes for driving whole acquisition cycles
//!
//! Every fake shares one [`Bench`]: a simulated clock plus an ordered log of
//! what happened on the LED pin, the sensor and the delay provider.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use smartcup_color::{
    AcquisitionController, Clock, ColorSensor, FrameBuffer, FrameDisplay, RawChannels,
};

/// Something observable on the bench
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    LedOn,
    LedOff,
    /// Millisecond pause requested by the controller
    Pause(u32),
    Enable,
    Disable,
    Interrupt(bool),
    ClearInterrupt,
    Limits(u16, u16),
    Read,
}

#[derive(Default)]
struct BenchState {
    now_us: u64,
    events: Vec<Event>,
}

/// Shared simulated time and event log
#[derive(Clone, Default)]
pub struct Bench(Rc<RefCell<BenchState>>);

impl Bench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Instant {
        Instant::from_micros(self.0.borrow().now_us)
    }

    pub fn advance(&self, duration: Duration) {
        self.0.borrow_mut().now_us += duration.as_micros();
    }

    pub fn set_now(&self, instant: Instant) {
        self.0.borrow_mut().now_us = instant.as_micros();
    }

    pub fn record(&self, event: Event) {
        self.0.borrow_mut().events.push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    /// Events recorded since the last call
    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut self.0.borrow_mut().events)
    }

    pub fn count(&self, event: Event) -> usize {
        self.0.borrow().events.iter().filter(|e| **e == event).count()
    }

    pub fn clock(&self) -> FakeClock {
        FakeClock(self.clone())
    }

    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            bench: self.clone(),
            poll_step: None,
        }
    }

    pub fn led(&self) -> FakeLed {
        FakeLed {
            bench: self.clone(),
        }
    }

    /// Interrupt line that goes low once the bench clock reaches `at`
    pub fn interrupt_at(&self, at: Instant) -> FakeInterrupt {
        FakeInterrupt {
            bench: self.clone(),
            asserts_at: Some(at),
        }
    }

    /// Interrupt line that never asserts
    pub fn silent_interrupt(&self) -> FakeInterrupt {
        FakeInterrupt {
            bench: self.clone(),
            asserts_at: None,
        }
    }

    pub fn sensor(&self, channels: RawChannels) -> FakeSensor {
        FakeSensor {
            bench: self.clone(),
            channels: Some(channels),
        }
    }

    /// Sensor whose channel read always fails
    pub fn broken_sensor(&self) -> FakeSensor {
        FakeSensor {
            bench: self.clone(),
            channels: None,
        }
    }
}

pub struct FakeClock(Bench);

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.0.now()
    }
}

/// Delay that advances the bench clock instead of sleeping
pub struct FakeDelay {
    bench: Bench,
    poll_step: Option<Duration>,
}

impl FakeDelay {
    /// Advance the clock by `step` on every sub-millisecond poll, whatever
    /// was asked for
    #[must_use]
    pub fn with_poll_step(mut self, step: Duration) -> Self {
        self.poll_step = Some(step);
        self
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.bench.advance(Duration::from_nanos(u64::from(ns)));
    }

    async fn delay_us(&mut self, us: u32) {
        let step = self
            .poll_step
            .unwrap_or(Duration::from_micros(u64::from(us)));
        self.bench.advance(step);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.bench.record(Event::Pause(ms));
        self.bench.advance(Duration::from_millis(u64::from(ms)));
    }
}

pub struct FakeLed {
    bench: Bench,
}

impl ErrorType for FakeLed {
    type Error = Infallible;
}

impl OutputPin for FakeLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.bench.record(Event::LedOff);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.bench.record(Event::LedOn);
        Ok(())
    }
}

/// Active-low interrupt line
pub struct FakeInterrupt {
    bench: Bench,
    asserts_at: Option<Instant>,
}

impl ErrorType for FakeInterrupt {
    type Error = Infallible;
}

impl InputPin for FakeInterrupt {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.asserts_at.is_some_and(|at| self.bench.now() >= at))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorFault;

pub struct FakeSensor {
    bench: Bench,
    channels: Option<RawChannels>,
}

impl ColorSensor for FakeSensor {
    type Error = SensorFault;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        self.bench.record(Event::Enable);
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        self.bench.record(Event::Disable);
        Ok(())
    }

    async fn set_interrupt(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.bench.record(Event::Interrupt(enabled));
        Ok(())
    }

    async fn clear_interrupt(&mut self) -> Result<(), Self::Error> {
        self.bench.record(Event::ClearInterrupt);
        Ok(())
    }

    async fn set_interrupt_limits(&mut self, low: u16, high: u16) -> Result<(), Self::Error> {
        self.bench.record(Event::Limits(low, high));
        Ok(())
    }

    async fn read_raw(&mut self) -> Result<RawChannels, Self::Error> {
        self.bench.record(Event::Read);
        self.channels.ok_or(SensorFault)
    }
}

pub type BenchController =
    AcquisitionController<FakeSensor, FakeLed, FakeInterrupt, FakeDelay, FakeClock>;

/// 240x240 frame that counts panel pushes
pub struct FakePanel {
    pub frame: Box<FrameBuffer<240, 240>>,
    pub flushes: usize,
}

impl FakePanel {
    pub fn new() -> Self {
        Self {
            frame: Box::new(FrameBuffer::new()),
            flushes: 0,
        }
    }
}

impl Default for FakePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FakePanel {
    fn size(&self) -> Size {
        self.frame.size()
    }
}

impl DrawTarget for FakePanel {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels)
    }
}

impl FrameDisplay for FakePanel {
    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}
