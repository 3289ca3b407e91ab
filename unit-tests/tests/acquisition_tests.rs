//! Acquisition protocol against a simulated bench: timing, reset schedule,
//! timeout recovery.

use embassy_futures::block_on;
use embassy_time::{Duration, Instant};
use smartcup_color::{
    AcquisitionController, AcquisitionError, AcquisitionPhase, AcquisitionTimings, RawChannels,
};
use tests::{Bench, BenchController, Event};

const CHANNELS: RawChannels = RawChannels::new(600, 900, 1100, 2000);

fn controller(bench: &Bench, interrupt_at: Instant) -> BenchController {
    AcquisitionController::new(
        bench.sensor(CHANNELS),
        bench.led(),
        bench.interrupt_at(interrupt_at),
        bench.delay(),
        bench.clock(),
    )
}

/// Interrupt line that is asserted from the start
fn always_ready(bench: &Bench) -> BenchController {
    controller(bench, Instant::from_ticks(0))
}

#[test]
fn initialize_arms_full_range_interrupt_with_led_off() {
    let bench = Bench::new();
    let mut acquisition = always_ready(&bench);

    block_on(acquisition.initialize());

    assert_eq!(
        bench.events(),
        vec![
            Event::LedOff,
            Event::Interrupt(true),
            Event::ClearInterrupt,
            Event::Limits(0, u16::MAX),
        ]
    );
    assert_eq!(acquisition.phase(), AcquisitionPhase::Idle);
}

#[test]
fn cycle_follows_timing_sequence() {
    let bench = Bench::new();
    let mut acquisition = controller(&bench, Instant::from_millis(950));

    let sample = block_on(acquisition.run_cycle()).unwrap();

    assert_eq!(sample.channels, CHANNELS);
    assert_eq!(sample.captured_at, Instant::from_millis(950));
    assert_eq!(
        bench.events(),
        vec![
            Event::Pause(400),
            Event::LedOn,
            Event::Pause(500),
            Event::ClearInterrupt,
            Event::Interrupt(true),
            Event::Read,
            Event::Interrupt(false),
            Event::Pause(400),
            Event::LedOff,
        ]
    );
    assert_eq!(bench.now(), Instant::from_millis(1350));
    assert_eq!(acquisition.phase(), AcquisitionPhase::Idle);
}

#[test]
fn timeout_turns_led_off_and_produces_no_sample() {
    let bench = Bench::new();
    let mut acquisition = AcquisitionController::new(
        bench.sensor(CHANNELS),
        bench.led(),
        bench.silent_interrupt(),
        bench.delay(),
        bench.clock(),
    );

    let result = block_on(acquisition.run_cycle());

    assert_eq!(result, Err(AcquisitionError::Timeout));
    assert_eq!(bench.count(Event::Read), 0);
    assert_eq!(bench.events().last(), Some(&Event::LedOff));
    assert_eq!(acquisition.phase(), AcquisitionPhase::Idle);

    // waited a little over the timeout after the 900 ms warmup
    let waited = bench.now() - Instant::from_millis(900);
    assert!(waited > Duration::from_millis(1000));
    assert!(waited <= Duration::from_millis(1002));
}

#[test]
fn timeout_is_bounded_when_clock_jumps() {
    let bench = Bench::new();
    let mut acquisition = AcquisitionController::new(
        bench.sensor(CHANNELS),
        bench.led(),
        bench.silent_interrupt(),
        bench.delay().with_poll_step(Duration::from_secs(3600)),
        bench.clock(),
    );

    let result = block_on(acquisition.run_cycle());

    assert_eq!(result, Err(AcquisitionError::Timeout));
    assert_eq!(bench.events().last(), Some(&Event::LedOff));
    // a single poll was enough to see the deadline pass
    assert_eq!(
        bench.now(),
        Instant::from_millis(900) + Duration::from_secs(3600)
    );
}

#[test]
fn controller_recovers_after_timeout() {
    let bench = Bench::new();
    // fires only after the first cycle has given up
    let mut acquisition = controller(&bench, Instant::from_millis(2500));

    assert_eq!(
        block_on(acquisition.run_cycle()),
        Err(AcquisitionError::Timeout)
    );
    let sample = block_on(acquisition.run_cycle()).unwrap();
    assert_eq!(sample.channels, CHANNELS);
}

#[test]
fn read_failure_yields_zero_sample() {
    let bench = Bench::new();
    let mut acquisition = AcquisitionController::new(
        bench.broken_sensor(),
        bench.led(),
        bench.interrupt_at(Instant::from_ticks(0)),
        bench.delay(),
        bench.clock(),
    );

    let sample = block_on(acquisition.run_cycle()).unwrap();

    assert_eq!(sample.channels, RawChannels::default());
    assert_eq!(bench.count(Event::Interrupt(false)), 1);
    assert_eq!(bench.events().last(), Some(&Event::LedOff));
}

#[test]
fn no_reset_while_cycles_stay_within_interval() {
    let bench = Bench::new();
    let mut acquisition = always_ready(&bench);

    // 1.3 s per cycle, the 15th check happens at 19.1 s
    for _ in 0..15 {
        block_on(acquisition.run_cycle()).unwrap();
    }

    assert_eq!(bench.count(Event::Disable), 0);
    assert_eq!(bench.count(Event::Enable), 0);
    assert_eq!(acquisition.last_reset(), Instant::from_ticks(0));
}

#[test]
fn continuous_cycling_resets_once_per_interval() {
    let bench = Bench::new();
    let mut acquisition = always_ready(&bench);

    for _ in 0..16 {
        block_on(acquisition.run_cycle()).unwrap();
    }
    assert_eq!(bench.count(Event::Disable), 1);
    assert_eq!(acquisition.last_reset(), Instant::from_millis(20_400));

    for _ in 0..10 {
        block_on(acquisition.run_cycle()).unwrap();
    }
    assert_eq!(bench.count(Event::Disable), 1);
}

#[test]
fn reset_power_cycles_sensor_after_long_gap() {
    let bench = Bench::new();
    let mut acquisition = always_ready(&bench);
    bench.set_now(Instant::from_secs(30));

    block_on(acquisition.run_cycle()).unwrap();

    assert_eq!(
        bench.take_events(),
        vec![
            Event::Pause(400),
            Event::LedOn,
            Event::Pause(500),
            Event::Disable,
            Event::Pause(100),
            Event::Enable,
            Event::Pause(700),
            Event::ClearInterrupt,
            Event::Interrupt(true),
            Event::Read,
            Event::Interrupt(false),
            Event::Pause(400),
            Event::LedOff,
        ]
    );
    assert_eq!(acquisition.last_reset(), Instant::from_millis(30_900));

    // the very next cycle does not reset again
    block_on(acquisition.run_cycle()).unwrap();
    assert_eq!(bench.count(Event::Disable), 0);
}

#[test]
fn reset_requires_strictly_more_than_interval() {
    let bench = Bench::new();
    let mut acquisition = always_ready(&bench);

    // check lands exactly on the interval
    bench.set_now(Instant::from_millis(20_000 - 900));
    block_on(acquisition.run_cycle()).unwrap();
    assert_eq!(bench.count(Event::Disable), 0);

    // and one millisecond past it
    bench.set_now(Instant::from_millis(20_001 - 900));
    block_on(acquisition.run_cycle()).unwrap();
    assert_eq!(bench.count(Event::Disable), 1);
}

#[test]
fn custom_timings_are_honored() {
    let bench = Bench::new();
    let timings = AcquisitionTimings {
        pre_illumination: Duration::from_millis(10),
        illumination_settle: Duration::from_millis(20),
        post_read_settle: Duration::from_millis(30),
        ..AcquisitionTimings::DEFAULT
    };
    let mut acquisition = always_ready(&bench).with_timings(timings);

    block_on(acquisition.run_cycle()).unwrap();

    let pauses: Vec<_> = bench
        .events()
        .into_iter()
        .filter(|event| matches!(event, Event::Pause(_)))
        .collect();
    assert_eq!(
        pauses,
        vec![Event::Pause(10), Event::Pause(20), Event::Pause(30)]
    );
    assert_eq!(acquisition.timings(), &timings);
}

#[test]
fn independent_controllers_keep_their_own_reset_timer() {
    let bench = Bench::new();
    let mut first = always_ready(&bench);
    let mut second = always_ready(&bench);

    bench.set_now(Instant::from_secs(30));
    block_on(first.run_cycle()).unwrap();
    assert_eq!(bench.count(Event::Disable), 1);

    // the second controller has never reset, so it is due as well
    block_on(second.run_cycle()).unwrap();
    assert_eq!(bench.count(Event::Disable), 2);
    assert!(second.last_reset() > first.last_reset());
}
