mod clock;
mod panel;

pub(crate) use clock::SystemClock;
pub(crate) use panel::{Gc9a01, PanelFrame};
