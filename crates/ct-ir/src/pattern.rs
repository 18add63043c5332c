//! Pattern cells and their packed 32-bit encoding.
//!
//! Bit layout of a packed cell (least significant first):
//!
//! | bits  | field                                             |
//! |-------|---------------------------------------------------|
//! | 0-1   | kind: 0 empty, 1 note-on, 2 note-off (3 = empty)  |
//! | 2-5   | pitch class 0-11 (larger values clamp to 11)      |
//! | 6-9   | octave 0-9 (larger values clamp to 9)             |
//! | 10-11 | effect: none, vibrato, slide, arpeggio            |
//! | 12-15 | effect parameter: chord for arpeggio, else speed  |
//! | 16-23 | fine-tune in cents (signed)                       |
//! | 24-31 | volume, v/255 (0 = full volume)                   |

use alloc::vec::Vec;

use crate::effects::{Chord, Effect};
use crate::note::{note_from_octave, Note, NOTE_MAX};
use crate::sound::{InstrumentKey, Sound};

/// What a cell does to its channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellKind {
    #[default]
    Empty,
    NoteOn,
    NoteOff,
}

/// A single pattern cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    /// Semitone index from C0 (only meaningful for note-on)
    pub note: Note,
    pub effect: Effect,
    /// Effect speed in quarter units, 0 = default (1.0)
    pub speed: u8,
    /// Detune in cents
    pub fine_tune: i8,
    /// Volume 1-255, 0 = full
    pub volume: u8,
}

impl Cell {
    /// Create an empty cell.
    pub const fn empty() -> Self {
        Self {
            kind: CellKind::Empty,
            note: 0,
            effect: Effect::None,
            speed: 0,
            fine_tune: 0,
            volume: 0,
        }
    }

    /// A plain note-on.
    pub const fn note_on(note: Note) -> Self {
        Self { kind: CellKind::NoteOn, note, ..Self::empty() }
    }

    /// A key release.
    pub const fn note_off() -> Self {
        Self { kind: CellKind::NoteOff, ..Self::empty() }
    }

    /// Set the effect. An arpeggio clears the speed; see [`with_speed`](Self::with_speed).
    pub const fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        if matches!(effect, Effect::Arpeggio(_)) {
            self.speed = 0;
        }
        self
    }

    /// Set the effect speed in quarter units (low 4 bits).
    ///
    /// Arpeggio cells store their chord in the parameter nibble and always
    /// run at the default speed, so this is a no-op on them.
    pub const fn with_speed(mut self, speed: u8) -> Self {
        if !matches!(self.effect, Effect::Arpeggio(_)) {
            self.speed = speed & 0x0F;
        }
        self
    }

    pub const fn with_volume(mut self, volume: u8) -> Self {
        self.volume = volume;
        self
    }

    pub const fn with_fine_tune(mut self, cents: i8) -> Self {
        self.fine_tune = cents;
        self
    }

    /// Returns true if the cell does nothing.
    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Empty
    }

    /// Decode a packed 32-bit cell.
    pub fn decode(word: u32) -> Self {
        let kind = match word & 0x3 {
            1 => CellKind::NoteOn,
            2 => CellKind::NoteOff,
            _ => CellKind::Empty,
        };
        let pitch_class = (((word >> 2) & 0xF) as u8).min(11);
        let octave = (((word >> 6) & 0xF) as u8).min(9);
        let param = ((word >> 12) & 0xF) as u8;
        let (effect, speed) = match (word >> 10) & 0x3 {
            0 => (Effect::None, param),
            1 => (Effect::Vibrato, param),
            2 => (Effect::Slide, param),
            _ => (Effect::Arpeggio(Chord::from_index(param)), 0),
        };
        Self {
            kind,
            note: note_from_octave(octave, pitch_class),
            effect,
            speed,
            fine_tune: (word >> 16) as u8 as i8,
            volume: (word >> 24) as u8,
        }
    }

    /// Pack this cell into 32 bits.
    pub fn encode(&self) -> u32 {
        let kind: u32 = match self.kind {
            CellKind::Empty => 0,
            CellKind::NoteOn => 1,
            CellKind::NoteOff => 2,
        };
        let note = self.note.min(NOTE_MAX);
        let (effect, param): (u32, u8) = match self.effect {
            Effect::None => (0, self.speed),
            Effect::Vibrato => (1, self.speed),
            Effect::Slide => (2, self.speed),
            Effect::Arpeggio(chord) => (3, chord.index()),
        };
        kind | ((note % 12) as u32) << 2
            | ((note / 12) as u32) << 6
            | effect << 10
            | ((param & 0xF) as u32) << 12
            | (self.fine_tune as u8 as u32) << 16
            | (self.volume as u32) << 24
    }

    /// Expand a note-on cell into a `Sound`. Other kinds yield `None`.
    pub fn to_sound(&self, instrument: Option<InstrumentKey>) -> Option<Sound> {
        if self.kind != CellKind::NoteOn {
            return None;
        }
        let speed = if self.speed == 0 { 1.0 } else { self.speed as f32 / 4.0 };
        let volume = if self.volume == 0 { 1.0 } else { self.volume as f32 / 255.0 };
        let sound = Sound { note: self.note, instrument, ..Sound::default() };
        Some(
            sound
                .with_volume(volume)
                .with_effect(self.effect)
                .with_speed(speed)
                .with_fine_tune(self.fine_tune),
        )
    }
}

/// A pattern containing rows of cells across channels.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Number of rows
    pub rows: u16,
    /// Number of channels
    pub channels: u8,
    /// Pattern data, stored row-major: data[row * channels + channel]
    pub data: Vec<Cell>,
}

impl Pattern {
    /// Create a new pattern with empty cells.
    pub fn new(rows: u16, channels: u8) -> Self {
        Self {
            rows,
            channels,
            data: alloc::vec![Cell::empty(); rows as usize * channels as usize],
        }
    }

    /// Build a pattern from packed words, row-major. Missing words are empty.
    pub fn from_words(rows: u16, channels: u8, words: &[u32]) -> Self {
        let mut pattern = Self::new(rows, channels);
        for (cell, word) in pattern.data.iter_mut().zip(words) {
            *cell = Cell::decode(*word);
        }
        pattern
    }

    /// Get a reference to a cell.
    pub fn cell(&self, row: u16, channel: u8) -> &Cell {
        debug_assert!(row < self.rows);
        debug_assert!(channel < self.channels);
        &self.data[row as usize * self.channels as usize + channel as usize]
    }

    /// Get a mutable reference to a cell.
    pub fn cell_mut(&mut self, row: u16, channel: u8) -> &mut Cell {
        debug_assert!(row < self.rows);
        debug_assert!(channel < self.channels);
        &mut self.data[row as usize * self.channels as usize + channel as usize]
    }

    /// All cells in a row.
    pub fn row(&self, row: u16) -> &[Cell] {
        let start = row as usize * self.channels as usize;
        &self.data[start..start + self.channels as usize]
    }
}
