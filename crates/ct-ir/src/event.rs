//! Timestamped pattern events.

use crate::musical_time::MusicalTime;
use crate::pattern::Cell;

/// A cell scheduled on a channel at a musical time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    /// When the event fires
    pub time: MusicalTime,
    /// Target channel index
    pub channel: u8,
    /// What to do; never an empty cell
    pub cell: Cell,
}

impl Event {
    pub fn new(time: MusicalTime, channel: u8, cell: Cell) -> Self {
        Self { time, channel, cell }
    }
}
