use embassy_time::Delay;
use esp_hal::Async;
use esp_hal::Blocking;
use esp_hal::gpio::{Input, Output};
use esp_hal::i2c::master::I2c;
use esp_hal::spi::master::Spi;
use smartcup_color::{ColorAnalyzer, SampleCallback, Tcs34725};

use crate::infrastructure::drivers::{Gc9a01, SystemClock};

pub(crate) type SensorDriver = Tcs34725<I2c<'static, Async>, Delay>;

pub(crate) type PanelDriver = Gc9a01<Spi<'static, Blocking>, Output<'static>, Output<'static>>;

pub(crate) type Analyzer = ColorAnalyzer<
    SensorDriver,
    Output<'static>,
    Input<'static>,
    Delay,
    SystemClock,
    PanelDriver,
    SampleCallback,
>;
