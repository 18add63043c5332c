//! Beat-based time representation.
//!
//! `MusicalTime` uses beats as the universal time coordinate so row
//! positions stay exact regardless of tempo.

/// Subdivisions per beat. LCM(1..16) = 720720, divisible by
/// any rows_per_beat value from 1 to 16.
pub const SUB_BEAT_UNIT: u32 = 720_720;

/// A position in musical time (beats + fractional sub-beat).
///
/// Ordering: beat is primary, sub_beat is secondary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MusicalTime {
    /// Whole beats from song start
    pub beat: u64,
    /// Fraction of a beat: 0..SUB_BEAT_UNIT
    pub sub_beat: u32,
}

impl MusicalTime {
    /// The zero position (song start).
    pub const fn zero() -> Self {
        Self { beat: 0, sub_beat: 0 }
    }

    /// Create a time at an exact beat boundary.
    pub const fn from_beats(beat: u64) -> Self {
        Self { beat, sub_beat: 0 }
    }

    /// Advance by `rows` rows at `rows_per_beat` resolution.
    pub fn add_rows(self, rows: u32, rows_per_beat: u32) -> Self {
        if rows_per_beat == 0 {
            return self;
        }
        let sub_per_row = SUB_BEAT_UNIT / rows_per_beat;
        let total_sub = self.sub_beat as u64 + rows as u64 * sub_per_row as u64;
        let extra_beats = total_sub / SUB_BEAT_UNIT as u64;
        let remaining = (total_sub % SUB_BEAT_UNIT as u64) as u32;
        Self {
            beat: self.beat + extra_beats,
            sub_beat: remaining,
        }
    }

    /// Position in fractional beats, for comparison with the engine clock.
    pub fn as_beats(self) -> f64 {
        self.beat as f64 + self.sub_beat as f64 / SUB_BEAT_UNIT as f64
    }
}

impl PartialOrd for MusicalTime {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MusicalTime {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.beat.cmp(&other.beat).then(self.sub_beat.cmp(&other.sub_beat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default() {
        assert_eq!(MusicalTime::zero(), MusicalTime::default());
    }

    #[test]
    fn ordering() {
        let t0 = MusicalTime::zero();
        let t1 = MusicalTime::from_beats(1);
        let t_half = MusicalTime { beat: 0, sub_beat: SUB_BEAT_UNIT / 2 };
        assert!(t0 < t_half);
        assert!(t_half < t1);
    }

    #[test]
    fn add_rows_crosses_beat_boundary() {
        // 4 rows/beat, add 6 rows = 1 beat + 2 rows
        let t = MusicalTime::zero().add_rows(6, 4);
        assert_eq!(t.beat, 1);
        assert_eq!(t.sub_beat, 2 * (SUB_BEAT_UNIT / 4));
    }

    #[test]
    fn add_rows_exact_beat() {
        let t = MusicalTime::zero().add_rows(4, 4);
        assert_eq!(t, MusicalTime::from_beats(1));
    }

    #[test]
    fn add_rows_zero_rpb_is_noop() {
        let t = MusicalTime::from_beats(3);
        assert_eq!(t.add_rows(5, 0), t);
    }

    #[test]
    fn as_beats_is_fractional() {
        let t = MusicalTime::zero().add_rows(3, 2);
        assert!((t.as_beats() - 1.5).abs() < 1e-12);
    }
}
