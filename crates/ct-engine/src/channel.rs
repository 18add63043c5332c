//! Monophonic channel: effect processing on top of an instrument.

use core::f32::consts::TAU;

use ct_ir::{Chord, Effect, Sound, NOTE_C4};

use crate::frequency::{note_to_hz, semitone_to_hz};
use crate::instrument::InstrumentBank;
use crate::phase::PhaseAccumulator;

/// Slide interpolation counts as finished at this fraction.
const SLIDE_DONE: f32 = 1.0 - 1e-3;

/// Slides may only run on the first beat of every group of this many.
const BEATS_PER_BAR: u32 = 4;

/// Vibrato swing in Hz: the distance from C4 to C#4.
pub fn vibrato_depth() -> f32 {
    semitone_to_hz(NOTE_C4 as i32 + 1) - semitone_to_hz(NOTE_C4 as i32)
}

/// Chord tone for an LFO position `t` in `[0, 1)`.
///
/// The cycle is split into equal parts, one per chord tone. `t == 1.0`
/// maps to the last tone.
pub fn arpeggio_offset(chord: Chord, t: f32) -> i8 {
    let tones = chord.offsets();
    let index = (t.max(0.0) * tones.len() as f32) as usize;
    tones[index.min(tones.len() - 1)]
}

/// Playback state for a single channel.
///
/// Clocks are measured in beats: `step` is the fraction of a beat that
/// passes per sample.
#[derive(Clone, Debug, Default)]
pub struct Channel {
    /// Sound being played
    current: Option<Sound>,
    /// Sound played before `current` (slide source)
    previous: Option<Sound>,
    /// Effect LFO, restarted on every trigger
    lfo: PhaseAccumulator,
    /// Gate is held
    playing: bool,
    /// Slide still in progress
    sliding: bool,
    /// Beats since the current sound was triggered
    elapsed: f32,
    /// Beats since the last beat boundary
    beat_time: f32,
    /// Beat boundaries crossed; slides run when this is a multiple of 4
    bar: u32,
    /// Frequency used for the last rendered sample
    frequency: f32,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger a sound.
    pub fn play(&mut self, sound: Sound, instruments: &mut InstrumentBank) {
        if let Some(prev) = self.current {
            if prev.instrument != sound.instrument {
                if let Some(inst) = prev.instrument.and_then(|k| instruments.get_mut(k)) {
                    inst.note_off();
                }
            }
        }
        self.previous = self.current;
        self.current = Some(sound);
        self.playing = true;
        self.sliding = true;
        self.elapsed = 0.0;
        self.lfo.reset();
        if let Some(inst) = sound.instrument.and_then(|k| instruments.get_mut(k)) {
            inst.note_on();
        }
    }

    /// Release the gate. The instrument keeps sounding through its release.
    pub fn stop(&mut self, instruments: &mut InstrumentBank) {
        let key = self.current.and_then(|s| s.instrument);
        if let Some(inst) = key.and_then(|k| instruments.get_mut(k)) {
            inst.note_off();
        }
        self.playing = false;
        self.sliding = false;
    }

    /// Cut the current sound without a release.
    pub fn kill(&mut self, instruments: &mut InstrumentBank) {
        let key = self.current.and_then(|s| s.instrument);
        if let Some(inst) = key.and_then(|k| instruments.get_mut(k)) {
            inst.kill();
        }
        self.playing = false;
        self.sliding = false;
    }

    pub fn current(&self) -> Option<&Sound> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&Sound> {
        self.previous.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True while the current instrument's envelope is not idle.
    pub fn is_audible(&self, instruments: &InstrumentBank) -> bool {
        self.current
            .and_then(|s| s.instrument)
            .and_then(|k| instruments.get(k))
            .is_some_and(|inst| !inst.envelope().is_idle())
    }

    pub fn bar(&self) -> u32 {
        self.bar
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Render one sample.
    ///
    /// A missing sound or instrument renders silence; clocks still advance.
    pub fn sample(
        &mut self,
        instruments: &mut InstrumentBank,
        bpm: f32,
        step: f32,
        sample_rate: f32,
    ) -> f32 {
        let Some(sound) = self.current else {
            self.advance_clock(step);
            return 0.0;
        };
        let Some(inst) = sound.instrument.and_then(|k| instruments.get_mut(k)) else {
            self.advance_clock(step);
            return 0.0;
        };

        let lfo = self.lfo.normalized(bpm / 60.0 * sound.speed, sample_rate);

        let arpeggio = match sound.effect {
            Effect::Arpeggio(chord) => arpeggio_offset(chord, lfo),
            _ => 0,
        };
        let semitone = sound.note as i32 + arpeggio as i32 + inst.note_offset(self.elapsed) as i32;
        let mut frequency = note_to_hz(semitone, sound.fine_tune as f32);

        if sound.effect == Effect::Slide && self.bar % BEATS_PER_BAR == 0 && self.sliding {
            let from = self
                .previous
                .map(|p| note_to_hz(p.note as i32, p.fine_tune as f32))
                .unwrap_or(frequency);
            let t = self.elapsed.min(1.0);
            frequency = from + (frequency - from) * t;
            if t >= SLIDE_DONE {
                self.sliding = false;
            }
        }

        if sound.effect == Effect::Vibrato {
            frequency += libm::sinf(lfo * TAU) * vibrato_depth();
        }

        self.frequency = frequency;
        self.advance_clock(step);
        inst.sample(frequency, sample_rate) * sound.volume
    }

    fn advance_clock(&mut self, step: f32) {
        self.elapsed += step;
        self.beat_time += step;
        if self.beat_time >= 1.0 {
            self.beat_time -= 1.0;
            self.bar = self.bar.wrapping_add(1);
        }
    }
}
