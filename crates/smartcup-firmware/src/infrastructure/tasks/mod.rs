mod analysis;
mod notifier;

pub(crate) use analysis::color_analysis_task;
pub(crate) use notifier::{publish_sample, sample_notifier_task};
