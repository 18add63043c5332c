//! Song structure: instruments, channel assignment, patterns and order.

use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::instrument::InstrumentParams;
use crate::musical_time::MusicalTime;
use crate::pattern::Pattern;

/// A complete song.
#[derive(Clone, Debug)]
pub struct Song {
    /// Song title
    pub title: ArrayString<32>,
    /// Tempo in beats per minute
    pub bpm: f32,
    /// Clock subdivision of a tempo beat (1.0 = quarter notes)
    pub beat_unit: f32,
    /// Pattern rows per beat
    pub rows_per_beat: u8,
    /// Output gain applied after mixing
    pub master_volume: f32,
    /// Instrument definitions, referenced by index
    pub instruments: Vec<InstrumentParams>,
    /// Instrument index played by each channel (`None` = silent channel)
    pub channel_instruments: Vec<Option<u8>>,
    /// Pattern pool
    pub patterns: Vec<Pattern>,
    /// Playback order
    pub order: Vec<OrderEntry>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            title: ArrayString::new(),
            bpm: 120.0,
            beat_unit: 1.0,
            rows_per_beat: 4,
            master_volume: 0.8,
            instruments: Vec::new(),
            channel_instruments: Vec::new(),
            patterns: Vec::new(),
            order: Vec::new(),
        }
    }
}

impl Song {
    /// Create a new empty song.
    pub fn new(title: &str) -> Self {
        let mut song = Self::default();
        let _ = song.title.try_push_str(title);
        song
    }

    /// Create a song with `num_channels` unassigned channels.
    pub fn with_channels(title: &str, num_channels: u8) -> Self {
        let mut song = Self::new(title);
        song.channel_instruments = alloc::vec![None; num_channels as usize];
        song
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channel_instruments.len()
    }

    /// Add an instrument and return its index.
    pub fn add_instrument(&mut self, params: InstrumentParams) -> u8 {
        self.instruments.push(params);
        (self.instruments.len() - 1) as u8
    }

    /// Play `instrument` on `channel`. Out-of-range channels are ignored.
    pub fn assign(&mut self, channel: u8, instrument: u8) {
        if let Some(slot) = self.channel_instruments.get_mut(channel as usize) {
            *slot = Some(instrument);
        }
    }

    /// Add a pattern and return its index.
    pub fn add_pattern(&mut self, pattern: Pattern) -> u8 {
        self.patterns.push(pattern);
        (self.patterns.len() - 1) as u8
    }

    /// Append an entry to the order list.
    pub fn add_order(&mut self, entry: OrderEntry) {
        self.order.push(entry);
    }

    /// Total length of the ordered patterns.
    pub fn total_time(&self) -> MusicalTime {
        let rpb = self.rows_per_beat as u32;
        let mut time = MusicalTime::zero();
        for entry in &self.order {
            match entry {
                OrderEntry::Pattern(idx) => {
                    if let Some(pattern) = self.patterns.get(*idx as usize) {
                        time = time.add_rows(pattern.rows as u32, rpb);
                    }
                }
                OrderEntry::Skip => {}
                OrderEntry::End => break,
            }
        }
        time
    }
}

/// An entry in the order list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderEntry {
    /// Play pattern with this index
    Pattern(u8),
    /// Skip marker, continue to next
    Skip,
    /// End of song marker
    End,
}
