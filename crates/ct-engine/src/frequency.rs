//! Note-to-frequency conversion.
//!
//! 12-TET anchored at C0. The lowest octave is a lookup table; higher
//! octaves are reached by doubling, so every C is an exact power-of-two
//! multiple of C0.

/// Frequencies of C0..B0 in Hz (A0 = 27.5 Hz, so A4 = 440 Hz).
const BASE_OCTAVE: [f32; 12] = [
    16.351_598, // C
    17.323_914, // C#
    18.354_048, // D
    19.445_436, // D#
    20.601_722, // E
    21.826_764, // F
    23.124_651, // F#
    24.499_715, // G
    25.956_544, // G#
    27.5,       // A
    29.135_235, // A#
    30.867_706, // B
];

/// Frequency in Hz of a (possibly negative) semitone index from C0.
///
/// Negative indices fall below C0 by halving.
pub fn semitone_to_hz(semitone: i32) -> f32 {
    let pitch_class = semitone.rem_euclid(12) as usize;
    let octave = semitone.div_euclid(12);
    BASE_OCTAVE[pitch_class] * libm::exp2f(octave as f32)
}

/// Frequency of `semitone` detuned by `cents` (hundredths of a semitone).
pub fn note_to_hz(semitone: i32, cents: f32) -> f32 {
    let hz = semitone_to_hz(semitone);
    if cents == 0.0 {
        hz
    } else {
        hz * libm::exp2f(cents / 1200.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= b * 1e-5
    }

    #[test]
    fn a4_is_440() {
        assert!(close(semitone_to_hz(57), 440.0));
    }

    #[test]
    fn middle_c() {
        assert!(close(semitone_to_hz(48), 261.625_58));
    }

    #[test]
    fn octave_up_doubles() {
        for n in 0..96 {
            assert!(close(semitone_to_hz(n + 12), semitone_to_hz(n) * 2.0));
        }
    }

    #[test]
    fn semitone_ratio_is_twelfth_root_of_two() {
        let ratio = semitone_to_hz(58) / semitone_to_hz(57);
        assert!((ratio - 1.059_463).abs() < 1e-5);
    }

    #[test]
    fn below_c0_halves() {
        assert!(close(semitone_to_hz(-12), semitone_to_hz(0) / 2.0));
        assert!(close(semitone_to_hz(-3), 27.5 / 2.0));
    }

    #[test]
    fn hundred_cents_is_one_semitone() {
        assert!(close(note_to_hz(57, 100.0), semitone_to_hz(58)));
        assert!(close(note_to_hz(57, -1200.0), 220.0));
    }
}
