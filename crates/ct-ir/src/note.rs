//! Semitone note indices.
//!
//! A note is a semitone index counted from C0 (index 0). Octave `o`,
//! pitch class `p` is `o * 12 + p`, so A4 is 57.

/// A semitone index, 0 = C0.
pub type Note = u8;

/// Highest representable note (B9).
pub const NOTE_MAX: Note = 119;

/// Middle C.
pub const NOTE_C4: Note = 48;

/// Concert A (440 Hz).
pub const NOTE_A4: Note = 57;

const NAMES: [&str; 12] = ["C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-"];

/// Build a note from octave (0-9) and pitch class (0-11).
pub const fn note_from_octave(octave: u8, pitch_class: u8) -> Note {
    octave * 12 + pitch_class
}

/// Tracker-style name for a note, e.g. `("A-", 4)`.
pub fn note_name(note: Note) -> (&'static str, u8) {
    (NAMES[(note % 12) as usize], note / 12)
}
