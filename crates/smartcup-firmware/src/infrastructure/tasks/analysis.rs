use embassy_time::Timer;
use log::{debug, warn};
use smartcup_color::AnalysisError;

use crate::infrastructure::config;
use crate::infrastructure::types::Analyzer;

/// Runs analysis cycles back to back
///
/// Timed-out cycles are already reported by the acquisition layer and simply
/// retried on the next pass.
#[embassy_executor::task]
pub(crate) async fn color_analysis_task(mut analyzer: Analyzer) {
    analyzer.begin().await;

    loop {
        match analyzer.run_analysis().await {
            Ok(reading) => debug!(
                "analysis: color=({}, {}, {}) clear={}",
                reading.color.r,
                reading.color.g,
                reading.color.b,
                reading.raw.channels.c
            ),
            Err(AnalysisError::Acquisition(_)) => {}
            Err(AnalysisError::Display(err)) => warn!("analysis: failed to draw sample: {:?}", err),
        }
        Timer::after(config::ANALYSIS.cycle_gap).await;
    }
}
