//! Instrument parameters: oscillator shape, chorus, envelope, pitch contour.
//!
//! These are the static, editable settings. The engine builds its runtime
//! `Instrument` (phases, envelope state, wavetable) from them.

use alloc::string::String;

/// Maximum number of detuned chorus voices per instrument.
pub const MAX_CHORUS_VOICES: usize = 8;

/// Entries in an instrument's note-offset table.
pub const NOTE_OFFSET_STEPS: usize = 16;

/// Oscillator shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
    /// Stepped random values, re-rolled every half cycle
    Noise,
}

/// Attack/decay/release in seconds, sustain as a level in 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Adsr {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for Adsr {
    /// Flat envelope: full level while gated, instant release.
    fn default() -> Self {
        Self { attack: 0.0, decay: 0.0, sustain: 1.0, release: 0.0 }
    }
}

impl Adsr {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self { attack, decay, sustain, release }
    }

    /// Clamp every field into its valid range.
    pub fn sanitized(self) -> Self {
        Self {
            attack: self.attack.max(0.0),
            decay: self.decay.max(0.0),
            sustain: self.sustain.clamp(0.0, 1.0),
            release: self.release.max(0.0),
        }
    }
}

/// Everything needed to build a playable instrument.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InstrumentParams {
    pub name: String,
    pub waveform: Waveform,
    /// Chorus voice count, clamped to 1..=MAX_CHORUS_VOICES when built
    pub voices: u8,
    pub envelope: Adsr,
    /// Semitone offsets swept across the first beat of every note
    pub note_offsets: [i8; NOTE_OFFSET_STEPS],
}

impl Default for InstrumentParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            waveform: Waveform::Sine,
            voices: 1,
            envelope: Adsr::default(),
            note_offsets: [0; NOTE_OFFSET_STEPS],
        }
    }
}

impl InstrumentParams {
    /// Create parameters for a named instrument with defaults.
    pub fn new(name: &str, waveform: Waveform) -> Self {
        Self { name: String::from(name), waveform, ..Default::default() }
    }

    pub fn with_voices(mut self, voices: u8) -> Self {
        self.voices = voices;
        self
    }

    pub fn with_envelope(mut self, envelope: Adsr) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn with_note_offsets(mut self, offsets: [i8; NOTE_OFFSET_STEPS]) -> Self {
        self.note_offsets = offsets;
        self
    }
}
