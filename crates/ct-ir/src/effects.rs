//! Per-channel effect selection.

/// Chord shape cycled by the arpeggio effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Chord {
    #[default]
    Major,
    Minor,
    Maj7,
    Min7,
    Sus4,
    Sus2,
    Octave,
}

impl Chord {
    /// Semitone offsets from the root, in playback order.
    pub const fn offsets(self) -> &'static [i8] {
        match self {
            Chord::Major => &[0, 4, 7],
            Chord::Minor => &[0, 3, 7],
            Chord::Maj7 => &[0, 4, 7, 10],
            Chord::Min7 => &[0, 3, 7, 10],
            Chord::Sus4 => &[0, 5, 7],
            Chord::Sus2 => &[0, 2, 7],
            Chord::Octave => &[0, 12],
        }
    }

    /// Chord for a packed parameter nibble. Out-of-range values wrap.
    pub const fn from_index(index: u8) -> Self {
        match index % 7 {
            0 => Chord::Major,
            1 => Chord::Minor,
            2 => Chord::Maj7,
            3 => Chord::Min7,
            4 => Chord::Sus4,
            5 => Chord::Sus2,
            _ => Chord::Octave,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Pitch effect applied by a channel while a sound plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    #[default]
    None,
    /// Fixed-depth sine pitch wobble
    Vibrato,
    /// Glide from the previous sound's pitch over one beat
    Slide,
    /// Step through the chord tones
    Arpeggio(Chord),
}
