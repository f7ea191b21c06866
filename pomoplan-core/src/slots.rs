//! Slot generator: availability windows -> fixed half-hour slots.

use serde::{Deserialize, Serialize};

use crate::availability::TimeWindow;

/// Width of one slot in hours. One focus block occupies one slot.
pub const SLOT_HOURS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub start: f64,
    pub end: f64,
}

/// Cut each window into consecutive slots from its start, dropping a short
/// remainder. Windows are taken in the order given and not re-sorted.
pub fn generate_slots(windows: &[TimeWindow]) -> Vec<Slot> {
    let mut slots = Vec::new();
    for window in windows {
        let mut hour = window.start;
        while hour + SLOT_HOURS <= window.end {
            slots.push(Slot {
                start: hour,
                end: hour + SLOT_HOURS,
            });
            hour += SLOT_HOURS;
        }
    }
    slots
}
