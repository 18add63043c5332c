//! Core IR types for the chiptrack synthesizer.
//!
//! This crate defines the plain data shared by the engine, the format
//! loaders and the controller: notes, sounds, effects, instrument
//! parameters, the packed cell encoding, patterns and songs.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod effects;
mod event;
mod instrument;
mod musical_time;
mod note;
mod pattern;
pub mod song;
mod sound;

pub use effects::{Chord, Effect};
pub use event::Event;
pub use instrument::{Adsr, InstrumentParams, Waveform, MAX_CHORUS_VOICES, NOTE_OFFSET_STEPS};
pub use musical_time::{MusicalTime, SUB_BEAT_UNIT};
pub use note::{note_from_octave, note_name, Note, NOTE_A4, NOTE_C4, NOTE_MAX};
pub use pattern::{Cell, CellKind, Pattern};
pub use song::{OrderEntry, Song};
pub use sound::{InstrumentKey, Sound};
