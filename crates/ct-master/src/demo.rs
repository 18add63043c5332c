//! Built-in demo song.

use ct_ir::{
    note_from_octave, Adsr, Cell, Chord, Effect, InstrumentParams, Note, OrderEntry, Pattern,
    Song, Waveform, NOTE_OFFSET_STEPS,
};

use crate::config::EngineConfig;

const ROWS: u16 = 16;
const PARTS: u8 = 4;

const LEAD: u8 = 0;
const BASS: u8 = 1;
const DRUM: u8 = 2;
const PAD: u8 = 3;

/// Cents the pad sits below the other parts.
const PAD_DETUNE: i8 = -8;

const fn n(octave: u8, pitch_class: u8) -> Note {
    note_from_octave(octave, pitch_class)
}

/// The four demo instruments: square lead, saw bass, noise drum, triangle pad.
pub fn demo_instruments() -> Vec<InstrumentParams> {
    let mut kick = [0i8; NOTE_OFFSET_STEPS];
    for (i, step) in kick.iter_mut().enumerate().take(8) {
        *step = 24 - 3 * i as i8;
    }
    vec![
        InstrumentParams::new("lead", Waveform::Square)
            .with_voices(2)
            .with_envelope(Adsr::new(0.005, 0.1, 0.6, 0.15)),
        InstrumentParams::new("bass", Waveform::Saw)
            .with_voices(3)
            .with_envelope(Adsr::new(0.01, 0.05, 0.8, 0.1)),
        InstrumentParams::new("drum", Waveform::Noise)
            .with_envelope(Adsr::new(0.0, 0.08, 0.0, 0.02))
            .with_note_offsets(kick),
        InstrumentParams::new("pad", Waveform::Triangle)
            .with_voices(4)
            .with_envelope(Adsr::new(0.1, 0.2, 0.7, 0.5)),
    ]
}

/// Build the demo song with tempo, volume and instruments from `config`.
pub fn demo_song(config: &EngineConfig) -> Song {
    let mut song = Song::with_channels("demo", config.channels);
    song.bpm = config.bpm;
    song.beat_unit = config.beat_unit;
    song.master_volume = config.master_volume;

    song.instruments = demo_instruments();
    apply_instruments(&mut song, &config.instruments);

    let a = song.add_pattern(verse(&[
        (0, 0, Chord::Major),
        (9, -1, Chord::Minor),
        (5, -1, Chord::Major),
        (7, -1, Chord::Major),
    ]));
    let b = song.add_pattern(verse(&[
        (5, -1, Chord::Maj7),
        (7, -1, Chord::Sus4),
        (4, 0, Chord::Min7),
        (9, -1, Chord::Minor),
    ]));
    for idx in [a, b, a, b] {
        song.add_order(OrderEntry::Pattern(idx));
    }
    song.add_order(OrderEntry::End);
    song
}

/// Replace instruments by index with `overrides` and assign them to
/// channels round-robin.
pub fn apply_instruments(song: &mut Song, overrides: &[InstrumentParams]) {
    for (i, params) in overrides.iter().enumerate() {
        match song.instruments.get_mut(i) {
            Some(slot) => *slot = params.clone(),
            None => song.instruments.push(params.clone()),
        }
    }
    let count = song.instruments.len();
    if count == 0 {
        return;
    }
    for ch in 0..song.channel_count().min(u8::MAX as usize) {
        song.assign(ch as u8, (ch % count) as u8);
    }
}

/// One four-beat phrase; each chord is `(pitch class, octave shift, chord)`.
fn verse(chords: &[(u8, i8, Chord); 4]) -> Pattern {
    let mut pat = Pattern::new(ROWS, PARTS);
    for (beat, &(pc, shift, chord)) in chords.iter().enumerate() {
        let row = beat as u16 * 4;
        let octave = (4 + shift) as u8;

        *pat.cell_mut(row, LEAD) = Cell::note_on(n(octave, pc))
            .with_effect(Effect::Arpeggio(chord))
            .with_volume(180);
        *pat.cell_mut(row + 3, LEAD) = Cell::note_off();

        let bass = Cell::note_on(n(2, pc)).with_volume(220);
        *pat.cell_mut(row, BASS) = if beat == 0 { bass.with_effect(Effect::Slide) } else { bass };
        *pat.cell_mut(row + 2, BASS) = Cell::note_on(n(3, pc)).with_volume(160);

        *pat.cell_mut(row, DRUM) = Cell::note_on(n(2, 0));
        *pat.cell_mut(row + 2, DRUM) = Cell::note_on(n(5, 0)).with_volume(90);
    }
    let (root, shift, _) = chords[0];
    *pat.cell_mut(0, PAD) = Cell::note_on(n((3 + shift) as u8, root))
        .with_effect(Effect::Vibrato)
        .with_speed(2)
        .with_fine_tune(PAD_DETUNE)
        .with_volume(120);
    *pat.cell_mut(ROWS - 2, PAD) = Cell::note_off();
    pat
}
