//! A triggered note and everything a channel needs to play it.

use crate::effects::Effect;
use crate::note::{Note, NOTE_A4};

slotmap::new_key_type! {
    /// Handle to an instrument in the composition layer's instrument bank.
    pub struct InstrumentKey;
}

/// One triggered note.
///
/// Sounds are small `Copy` values: a channel keeps the current and the
/// previous one. The instrument is referenced by key, never owned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sound {
    /// Base note (semitone index from C0)
    pub note: Note,
    /// Linear gain, 0.0-1.0
    pub volume: f32,
    /// Active pitch effect
    pub effect: Effect,
    /// Effect LFO multiplier (1.0 = one cycle per beat)
    pub speed: f32,
    /// Detune in cents
    pub fine_tune: i8,
    /// Instrument to render with; `None` renders silence
    pub instrument: Option<InstrumentKey>,
}

impl Default for Sound {
    fn default() -> Self {
        Self {
            note: NOTE_A4,
            volume: 1.0,
            effect: Effect::None,
            speed: 1.0,
            fine_tune: 0,
            instrument: None,
        }
    }
}

impl Sound {
    /// A plain note at full volume on the given instrument.
    pub fn new(note: Note, instrument: InstrumentKey) -> Self {
        Self { note, instrument: Some(instrument), ..Default::default() }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_fine_tune(mut self, cents: i8) -> Self {
        self.fine_tune = cents;
        self
    }
}
