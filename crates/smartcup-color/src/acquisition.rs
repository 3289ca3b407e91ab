//! Acquisition controller - timed measurement protocol
//!
//! One cycle lights the sample, optionally power-cycles the sensor, waits
//! for the sensor's interrupt line and reads the four channels:
//!
//! ```text
//! Idle -> Warmup -> MaybeReset -> ArmedWait -> Read -> Shutdown -> Idle
//!                                     |
//!                                     +-- timeout: LED off -> Idle
//! ```
//!
//! The periodic reset is drift mitigation, it runs on schedule whether or not
//! the previous samples looked healthy.

use core::fmt;

use embassy_time::{Duration, Instant};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::sample::{RawChannels, RawSample};
use crate::sensor::ColorSensor;

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Timing of one acquisition cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionTimings {
    /// Idle time before the LED is switched on
    pub pre_illumination: Duration,
    /// LED settle time before touching the sensor
    pub illumination_settle: Duration,
    /// Time between two sensor power cycles
    pub reset_interval: Duration,
    /// Powered-down pause during a reset
    pub reset_power_down: Duration,
    /// Settle time after powering the sensor back up
    pub reset_settle: Duration,
    /// Maximum wait for the interrupt line
    pub interrupt_timeout: Duration,
    /// Poll period of the interrupt line
    pub interrupt_poll: Duration,
    /// Hold time between the read and switching the LED off
    pub post_read_settle: Duration,
}

impl AcquisitionTimings {
    pub const DEFAULT: Self = Self {
        pre_illumination: Duration::from_millis(400),
        illumination_settle: Duration::from_millis(500),
        reset_interval: Duration::from_millis(20_000),
        reset_power_down: Duration::from_millis(100),
        reset_settle: Duration::from_millis(700),
        interrupt_timeout: Duration::from_millis(1000),
        interrupt_poll: Duration::from_millis(1),
        post_read_settle: Duration::from_millis(400),
    };
}

impl Default for AcquisitionTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Acquisition state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionPhase {
    Idle,
    /// LED on, waiting for the light to stabilize
    Warmup,
    /// Checking whether the sensor is due for a power cycle
    MaybeReset,
    /// Interrupt armed, polling the line
    ArmedWait,
    /// Reading channel registers
    Read,
    /// Holding before the LED goes off
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionError {
    /// The interrupt line was not asserted within the timeout
    Timeout,
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionError::Timeout => f.write_str("timeout waiting for color sensor interrupt"),
        }
    }
}

/// Drives the sensor, the illumination LED and the interrupt line
///
/// The LED and the interrupt pin are owned by the controller, so nothing
/// else can toggle them in the middle of a cycle. `run_cycle` takes
/// `&mut self`, one cycle runs at a time.
pub struct AcquisitionController<S, L, I, D, C> {
    sensor: S,
    led: L,
    interrupt: I,
    delay: D,
    clock: C,
    timings: AcquisitionTimings,
    last_reset: Instant,
    phase: AcquisitionPhase,
}

impl<S, L, I, D, C> AcquisitionController<S, L, I, D, C>
where
    S: ColorSensor,
    L: OutputPin,
    I: InputPin,
    D: DelayNs,
    C: Clock,
{
    /// Create a new controller
    ///
    /// # Arguments
    /// * `sensor` - Color sensor
    /// * `led` - Illumination LED, active high
    /// * `interrupt` - Sensor interrupt line, active low
    /// * `delay` - Delay provider
    /// * `clock` - Monotonic clock
    pub fn new(sensor: S, led: L, interrupt: I, delay: D, clock: C) -> Self {
        Self {
            sensor,
            led,
            interrupt,
            delay,
            clock,
            timings: AcquisitionTimings::DEFAULT,
            last_reset: Instant::from_ticks(0),
            phase: AcquisitionPhase::Idle,
        }
    }

    #[must_use]
    pub fn with_timings(mut self, timings: AcquisitionTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn phase(&self) -> AcquisitionPhase {
        self.phase
    }

    /// Time of the last sensor power cycle
    pub fn last_reset(&self) -> Instant {
        self.last_reset
    }

    pub fn timings(&self) -> &AcquisitionTimings {
        &self.timings
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Switch the LED off and arm the interrupt with a full-range window, so
    /// every completed integration fires it.
    pub async fn initialize(&mut self) {
        self.led_off();

        if let Err(err) = self.sensor.set_interrupt(true).await {
            warn!("acquisition: failed to enable interrupt: {:?}", err);
        }
        if let Err(err) = self.sensor.clear_interrupt().await {
            warn!("acquisition: failed to clear interrupt: {:?}", err);
        }
        if let Err(err) = self.sensor.set_interrupt_limits(0, u16::MAX).await {
            warn!("acquisition: failed to set interrupt limits: {:?}", err);
        }

        self.phase = AcquisitionPhase::Idle;
    }

    /// Run one complete measurement
    ///
    /// On timeout the LED is switched off and no sample is produced; the
    /// controller stays usable and the next call starts a fresh cycle.
    pub async fn run_cycle(&mut self) -> Result<RawSample, AcquisitionError> {
        self.phase = AcquisitionPhase::Warmup;
        self.pause(self.timings.pre_illumination).await;
        self.led_on();
        self.pause(self.timings.illumination_settle).await;

        self.phase = AcquisitionPhase::MaybeReset;
        let now = self.clock.now();
        if self.is_reset_due(now) {
            self.reset_sensor().await;
            self.last_reset = now;
        }

        self.phase = AcquisitionPhase::ArmedWait;
        self.arm_interrupt().await;
        if let Err(err) = self.wait_for_interrupt().await {
            self.led_off();
            self.phase = AcquisitionPhase::Idle;
            warn!("acquisition: {}", err);
            return Err(err);
        }

        self.phase = AcquisitionPhase::Read;
        let captured_at = self.clock.now();
        let channels = match self.sensor.read_raw().await {
            Ok(channels) => channels,
            Err(err) => {
                warn!("acquisition: failed to read channels: {:?}", err);
                RawChannels::default()
            }
        };
        if let Err(err) = self.sensor.set_interrupt(false).await {
            warn!("acquisition: failed to disarm interrupt: {:?}", err);
        }

        self.phase = AcquisitionPhase::Shutdown;
        self.pause(self.timings.post_read_settle).await;
        self.led_off();

        debug!(
            "acquisition: R={} G={} B={} C={}",
            channels.r,
            channels.g,
            channels.b,
            channels.c
        );

        self.phase = AcquisitionPhase::Idle;
        Ok(RawSample::new(channels, captured_at))
    }

    fn is_reset_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_reset) > self.timings.reset_interval
    }

    /// Full power cycle of the sensor
    async fn reset_sensor(&mut self) {
        info!("acquisition: resetting color sensor");
        if let Err(err) = self.sensor.disable().await {
            warn!("acquisition: failed to disable sensor: {:?}", err);
        }
        self.pause(self.timings.reset_power_down).await;
        if let Err(err) = self.sensor.enable().await {
            warn!("acquisition: failed to enable sensor: {:?}", err);
        }
        self.pause(self.timings.reset_settle).await;
    }

    async fn arm_interrupt(&mut self) {
        if let Err(err) = self.sensor.clear_interrupt().await {
            warn!("acquisition: failed to clear interrupt: {:?}", err);
        }
        if let Err(err) = self.sensor.set_interrupt(true).await {
            warn!("acquisition: failed to arm interrupt: {:?}", err);
        }
    }

    /// Poll the active-low interrupt line until it asserts or the timeout
    /// elapses
    async fn wait_for_interrupt(&mut self) -> Result<(), AcquisitionError> {
        let started = self.clock.now();
        loop {
            if self.interrupt.is_low().unwrap_or(false) {
                return Ok(());
            }
            if self.clock.now().saturating_duration_since(started) > self.timings.interrupt_timeout {
                return Err(AcquisitionError::Timeout);
            }
            self.delay
                .delay_us(saturating_u32(self.timings.interrupt_poll.as_micros()))
                .await;
        }
    }

    async fn pause(&mut self, duration: Duration) {
        self.delay
            .delay_ms(saturating_u32(duration.as_millis()))
            .await;
    }

    fn led_on(&mut self) {
        let _ = self.led.set_high();
    }

    fn led_off(&mut self) {
        let _ = self.led.set_low();
    }
}

#[inline]
fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
