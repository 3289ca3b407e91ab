#![no_std]
#![no_main]

mod infrastructure;

use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig as PinConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::spi::Mode;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use log::{error, info};
use static_cell::ConstStaticCell;

use smartcup_color::{
    AcquisitionController, ColorAnalyzer, CorrectionPipeline, SampleSink, Tcs34725,
};

use crate::infrastructure::config;
use crate::infrastructure::drivers::{Gc9a01, PanelFrame, SystemClock};
use crate::infrastructure::tasks::{
    color_analysis_task, publish_sample, sample_notifier_task,
};

esp_bootloader_esp_idf::esp_app_desc!();

static FRAME: ConstStaticCell<PanelFrame> = ConstStaticCell::new(PanelFrame::new());

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    info!("smartcup: firmware {}", config::FIRMWARE.version);

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Color sensor
    let (sda, scl) = crate::sensor_i2c_gpio!(peripherals);
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .unwrap()
    .with_sda(sda)
    .with_scl(scl)
    .into_async();

    let mut sensor = Tcs34725::new(i2c, Delay);
    if let Err(err) = sensor.init().await {
        error!("smartcup: color sensor not found: {:?}", err);
        idle().await;
    }

    let led = Output::new(crate::led_gpio!(peripherals), Level::Low, PinConfig::default());
    let interrupt = Input::new(
        crate::sensor_int_gpio!(peripherals),
        InputConfig::default().with_pull(Pull::Up),
    );

    // Round panel
    let (sck, mosi, cs, dc, rst, backlight) = crate::panel_gpio!(peripherals);
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(config::PANEL.spi_frequency_mhz))
            .with_mode(Mode::_0),
    )
    .unwrap()
    .with_sck(sck)
    .with_mosi(mosi);

    let mut reset = Output::new(rst, Level::High, PinConfig::default());
    let _backlight = Output::new(backlight, Level::High, PinConfig::default());
    let mut panel = Gc9a01::new(
        spi,
        Output::new(dc, Level::Low, PinConfig::default()),
        Output::new(cs, Level::High, PinConfig::default()),
        FRAME.take(),
    );
    if let Err(err) = panel.init(&mut reset, &mut esp_hal::delay::Delay::new()) {
        error!("smartcup: panel init failed: {:?}", err);
    }

    // Analysis pipeline
    let pipeline = match CorrectionPipeline::new(config::CALIBRATION) {
        Ok(pipeline) => pipeline.with_saturation_boost(config::ANALYSIS.saturation_boost),
        Err(err) => {
            error!("smartcup: invalid calibration: {:?}", err);
            idle().await
        }
    };
    let acquisition = AcquisitionController::new(sensor, led, interrupt, Delay, SystemClock);
    let mut sink = SampleSink::new(panel, &config::OUTPUT);
    sink.set_observer(publish_sample);

    let analyzer = ColorAnalyzer::new(acquisition, pipeline, sink);
    spawner.spawn(sample_notifier_task()).ok();
    spawner.spawn(color_analysis_task(analyzer)).ok();

    idle().await
}

async fn idle() -> ! {
    loop {
        Timer::after(Duration::from_secs(5)).await;
    }
}
