//! Infrastructure layer - hardware bindings and tasks
//!
//! Concrete esp-hal drivers for the sensor board and the round panel, plus
//! the embassy tasks that run the analysis loop and publish samples.

pub(crate) mod config;
pub(crate) mod drivers;
pub(crate) mod tasks;
pub(crate) mod types;
