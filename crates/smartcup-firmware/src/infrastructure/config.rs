use embassy_time::Duration;
use smartcup_color::{
    Calibration, ChannelCalibration, DEFAULT_SATURATION_BOOST, LabelMode, OutputConfig, OutputMode,
};

pub(crate) struct FirmwareConfig {
    pub version: &'static str,
}

pub(crate) struct AnalysisConfig {
    pub saturation_boost: f32,
    /// Pause between two analysis cycles, on top of the cycle's own timing
    pub cycle_gap: Duration,
}

pub(crate) struct PanelConfig {
    pub spi_frequency_mhz: u32,
}

pub(crate) const FIRMWARE: FirmwareConfig = FirmwareConfig {
    version: env!("BUILD_VERSION"),
};

/// Black and white card readings of the first sensor board
#[cfg(feature = "sensor1")]
pub(crate) const CALIBRATION: Calibration = Calibration::new(
    ChannelCalibration::new(118, 1115),
    ChannelCalibration::new(180, 1774),
    ChannelCalibration::new(203, 2061),
    ChannelCalibration::new(453, 3004),
);
/// Black and white card readings of the second sensor board
#[cfg(all(feature = "sensor2", not(feature = "sensor1")))]
pub(crate) const CALIBRATION: Calibration = Calibration::new(
    ChannelCalibration::new(97, 396),
    ChannelCalibration::new(145, 629),
    ChannelCalibration::new(166, 740),
    ChannelCalibration::new(949, 8553),
);
#[cfg(not(any(feature = "sensor1", feature = "sensor2")))]
compile_error!("select a calibration with the `sensor1` or `sensor2` feature");

pub(crate) const OUTPUT: OutputConfig = OutputConfig {
    mode: OutputMode::Display,
    headless: false,
    labels: LabelMode::Corrected,
};

pub(crate) const ANALYSIS: AnalysisConfig = AnalysisConfig {
    saturation_boost: DEFAULT_SATURATION_BOOST,
    cycle_gap: Duration::from_millis(0),
};

pub(crate) const PANEL: PanelConfig = PanelConfig {
    spi_frequency_mhz: 40,
};

/// Sensor-to-MCU pins: I2C data, I2C clock
#[macro_export]
macro_rules! sensor_i2c_gpio {
    ($p:expr) => {
        ($p.GPIO6, $p.GPIO7)
    };
}

/// Active-low TCS34725 interrupt line
#[macro_export]
macro_rules! sensor_int_gpio {
    ($p:expr) => {
        $p.GPIO18
    };
}

/// Illumination LED, active high
#[macro_export]
macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO17
    };
}

/// GC9A01 panel: clock, data, chip select, data/command, reset, backlight
#[macro_export]
macro_rules! panel_gpio {
    ($p:expr) => {
        (
            $p.GPIO10, $p.GPIO11, $p.GPIO9, $p.GPIO8, $p.GPIO12, $p.GPIO40,
        )
    };
}
