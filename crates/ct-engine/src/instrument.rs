//! Runtime instrument: wavetable, envelope and detuned chorus voices.
//!
//! Instruments live in an [`InstrumentBank`] owned by whoever composes the
//! music; channels only hold an `InstrumentKey`. The envelope is shared
//! state, so only one channel should gate a given instrument at a time.

use ct_ir::{
    Adsr, InstrumentKey, InstrumentParams, Waveform, MAX_CHORUS_VOICES, NOTE_OFFSET_STEPS,
};
use slotmap::SlotMap;

use crate::envelope::EnvelopeGenerator;
use crate::phase::PhaseAccumulator;
use crate::wavetable::WaveTable;

/// Arena of instruments addressed by `InstrumentKey`.
pub type InstrumentBank = SlotMap<InstrumentKey, Instrument>;

/// A playable instrument.
#[derive(Clone, Debug)]
pub struct Instrument {
    wavetable: WaveTable,
    envelope: EnvelopeGenerator,
    voices: [PhaseAccumulator; MAX_CHORUS_VOICES],
    voice_count: usize,
    note_offsets: [i8; NOTE_OFFSET_STEPS],
}

impl Default for Instrument {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrument {
    /// Single-voice sine with a flat envelope.
    pub fn new() -> Self {
        Self {
            wavetable: WaveTable::new(),
            envelope: EnvelopeGenerator::new(),
            voices: [PhaseAccumulator::new(); MAX_CHORUS_VOICES],
            voice_count: 1,
            note_offsets: [0; NOTE_OFFSET_STEPS],
        }
    }

    pub fn from_params(params: &InstrumentParams) -> Self {
        let mut inst = Self::new();
        inst.set_waveform(params.waveform);
        inst.set_voices(params.voices as usize);
        inst.set_envelope(params.envelope);
        inst.note_offsets = params.note_offsets;
        inst
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.wavetable.set_waveform(waveform);
    }

    pub fn waveform(&self) -> Waveform {
        self.wavetable.waveform()
    }

    /// Set the chorus voice count, clamped to `1..=MAX_CHORUS_VOICES`.
    pub fn set_voices(&mut self, count: usize) {
        self.voice_count = count.clamp(1, MAX_CHORUS_VOICES);
    }

    pub fn voices(&self) -> usize {
        self.voice_count
    }

    pub fn set_envelope(&mut self, params: Adsr) {
        self.envelope.set_params(params);
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.envelope
    }

    pub fn set_note_offsets(&mut self, offsets: [i8; NOTE_OFFSET_STEPS]) {
        self.note_offsets = offsets;
    }

    /// Pitch contour offset `elapsed_beats` into a note.
    ///
    /// The table spans the first beat; the last entry holds afterwards.
    pub fn note_offset(&self, elapsed_beats: f32) -> i8 {
        let step = (elapsed_beats.max(0.0) * NOTE_OFFSET_STEPS as f32) as usize;
        self.note_offsets[step.min(NOTE_OFFSET_STEPS - 1)]
    }

    /// Restart every voice and open the envelope.
    pub fn note_on(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.wavetable.retrigger_noise();
        self.envelope.gate(true);
    }

    /// Restart the noise sequence so a replay renders the same samples.
    pub fn reseed_noise(&mut self) {
        self.wavetable.reseed();
    }

    /// Close the envelope; the note fades through its release.
    pub fn note_off(&mut self) {
        self.envelope.gate(false);
    }

    /// Silence immediately, skipping the release.
    pub fn kill(&mut self) {
        self.envelope.kill();
    }

    /// Render one sample at `frequency`.
    ///
    /// Voice `v` runs `v` Hz below the base frequency. The voice sum is
    /// averaged, then shaped by the envelope.
    #[inline]
    pub fn sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let mut acc = 0.0;
        for (v, phase) in self.voices[..self.voice_count].iter_mut().enumerate() {
            let t = phase.normalized(frequency - v as f32, sample_rate);
            acc += self.wavetable.sample_voice(v, t);
        }
        acc / self.voice_count as f32 * self.envelope.sample(sample_rate)
    }
}
