//! Time-sorted event queue.

use alloc::vec::Vec;
use ct_ir::Event;

/// Events sorted by time, consumed through a cursor.
///
/// Draining only moves the cursor, so the playback path never allocates.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<Event>,
    /// Next event to dispatch
    cursor: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new(), cursor: 0 }
    }

    /// Build a queue from an already sorted event list.
    pub fn from_sorted(events: Vec<Event>) -> Self {
        debug_assert!(events.windows(2).all(|w| w[0].time <= w[1].time));
        Self { events, cursor: 0 }
    }

    /// Insert an event, keeping time order. Equal times keep insertion order.
    pub fn push(&mut self, event: Event) {
        let pos = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(pos, event);
    }

    /// Index range of events at or before `beats`, advancing the cursor past them.
    pub fn drain_until(&mut self, beats: f64) -> core::ops::Range<usize> {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].time.as_beats() <= beats {
            self.cursor += 1;
        }
        start..self.cursor
    }

    /// Event by index, for use with `drain_until` ranges.
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Move the cursor back to the first event.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// True once every event has been drained.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }
}
