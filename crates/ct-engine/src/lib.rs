//! Synthesis engine for the chiptrack synthesizer.
//!
//! Wavetable oscillators, ADSR envelopes and chorus instruments feed
//! effect channels; the tracker blends the channels into one signal and
//! the player drives it from a scheduled song.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod channel;
mod envelope;
mod event_queue;
mod frequency;
mod instrument;
mod mixer;
mod pcm;
mod phase;
mod player;
pub mod scheduler;
mod wavetable;

pub use channel::{arpeggio_offset, vibrato_depth, Channel};
pub use envelope::{EnvelopeGenerator, EnvelopeStage};
pub use event_queue::EventQueue;
pub use frequency::{note_to_hz, semitone_to_hz};
pub use instrument::{Instrument, InstrumentBank};
pub use mixer::{beat_step, mix, Tracker, MAX_CHANNELS};
pub use pcm::quantize_u8;
pub use phase::PhaseAccumulator;
pub use player::{Player, RELEASE_TAIL_SECONDS};
pub use scheduler::schedule_song;
pub use wavetable::{WaveTable, TABLE_SIZE};
