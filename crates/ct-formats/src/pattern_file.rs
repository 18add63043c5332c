//! `.ctrk` pattern file: a header followed by packed cell words.
//!
//! Layout (little-endian):
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 4 | magic `CTRK` |
//! | 4 | 1 | version (1) |
//! | 5 | 1 | channels |
//! | 6 | 1 | rows per beat |
//! | 7 | 1 | reserved |
//! | 8 | 2 | bpm |
//! | 10 | 2 | rows |
//! | 12 | 4·rows·channels | cells, row-major |

use std::io::Cursor;
use std::path::Path;

use binrw::BinRead;
use ct_ir::{OrderEntry, Pattern, Song};

use crate::FormatError;

const VERSION: u8 = 1;

/// Most channels a pattern file may declare.
pub const MAX_FILE_CHANNELS: u8 = 8;

/// Raw contents of a pattern file.
#[derive(BinRead, Debug, Clone)]
#[br(little, magic = b"CTRK")]
pub struct PatternFile {
    pub version: u8,
    pub channels: u8,
    pub rows_per_beat: u8,
    pub reserved: u8,
    pub bpm: u16,
    pub rows: u16,
    #[br(count = rows as usize * channels as usize)]
    pub cells: Vec<u32>,
}

impl PatternFile {
    /// Parse and validate a pattern file.
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let file = Self::read(&mut Cursor::new(data)).map_err(map_binrw_error)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), FormatError> {
        if self.version != VERSION {
            return Err(FormatError::UnsupportedVersion(self.version));
        }
        if self.channels == 0 || self.channels > MAX_FILE_CHANNELS {
            return Err(FormatError::InvalidField {
                field: "channels",
                value: self.channels as u32,
            });
        }
        if self.rows_per_beat == 0 {
            return Err(FormatError::InvalidField { field: "rows_per_beat", value: 0 });
        }
        if self.bpm == 0 {
            return Err(FormatError::InvalidField { field: "bpm", value: 0 });
        }
        Ok(())
    }

    /// A single-pattern song. Channels are left without instruments.
    pub fn into_song(self, title: &str) -> Song {
        let mut song = Song::with_channels(title, self.channels);
        song.bpm = self.bpm as f32;
        song.rows_per_beat = self.rows_per_beat;
        let idx = song.add_pattern(Pattern::from_words(self.rows, self.channels, &self.cells));
        song.add_order(OrderEntry::Pattern(idx));
        song
    }
}

fn map_binrw_error(err: binrw::Error) -> FormatError {
    match err {
        binrw::Error::BadMagic { .. } => FormatError::InvalidHeader,
        binrw::Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            FormatError::UnexpectedEof
        }
        binrw::Error::Io(e) => FormatError::Io(e),
        binrw::Error::Backtrace(bt) => map_binrw_error(*bt.error),
        other => FormatError::Parse(other.to_string()),
    }
}

/// Parse a pattern file into a playable song.
pub fn load_pattern_file(data: &[u8]) -> Result<Song, FormatError> {
    let file = PatternFile::parse(data)?;
    log::debug!(
        "pattern file: {} rows x {} channels at {} bpm",
        file.rows,
        file.channels,
        file.bpm
    );
    Ok(file.into_song("pattern"))
}

/// Read and parse a pattern file from disk, titled after the file stem.
pub fn load_pattern_path(path: &Path) -> Result<Song, FormatError> {
    let data = std::fs::read(path)?;
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pattern");
    Ok(PatternFile::parse(&data)?.into_song(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_ir::{Cell, CellKind, Chord, Effect};

    fn file_bytes(
        version: u8,
        channels: u8,
        rpb: u8,
        bpm: u16,
        rows: u16,
        cells: &[u32],
    ) -> Vec<u8> {
        let mut out = b"CTRK".to_vec();
        out.extend_from_slice(&[version, channels, rpb, 0]);
        out.extend_from_slice(&bpm.to_le_bytes());
        out.extend_from_slice(&rows.to_le_bytes());
        for c in cells {
            out.extend_from_slice(&c.to_le_bytes());
        }
        out
    }

    #[test]
    fn loads_song() {
        let arp = Cell::note_on(48).with_effect(Effect::Arpeggio(Chord::Minor)).encode();
        let off = Cell::note_off().encode();
        let data = file_bytes(1, 2, 4, 140, 2, &[arp, 0, 0, off]);
        let song = load_pattern_file(&data).unwrap();

        assert_eq!(song.bpm, 140.0);
        assert_eq!(song.rows_per_beat, 4);
        assert_eq!(song.channel_count(), 2);
        assert_eq!(song.order, vec![OrderEntry::Pattern(0)]);
        let pat = &song.patterns[0];
        assert_eq!(pat.cell(0, 0).note, 48);
        assert_eq!(pat.cell(0, 0).effect, Effect::Arpeggio(Chord::Minor));
        assert!(pat.cell(0, 1).is_empty());
        assert_eq!(pat.cell(1, 1).kind, CellKind::NoteOff);
    }

    #[test]
    fn bad_magic() {
        let mut data = file_bytes(1, 1, 4, 120, 0, &[]);
        data[0] = b'X';
        assert!(matches!(load_pattern_file(&data), Err(FormatError::InvalidHeader)));
    }

    #[test]
    fn truncated_cells() {
        let mut data = file_bytes(1, 2, 4, 120, 2, &[1, 2, 3, 4]);
        data.truncate(data.len() - 2);
        assert!(matches!(load_pattern_file(&data), Err(FormatError::UnexpectedEof)));
    }

    #[test]
    fn truncated_header() {
        assert!(matches!(load_pattern_file(b"CTRK\x01"), Err(FormatError::UnexpectedEof)));
    }

    #[test]
    fn unsupported_version() {
        let data = file_bytes(2, 1, 4, 120, 0, &[]);
        assert!(matches!(load_pattern_file(&data), Err(FormatError::UnsupportedVersion(2))));
    }

    #[test]
    fn invalid_fields() {
        let cases = [
            (0, 4, 120, "channels"),
            (9, 4, 120, "channels"),
            (1, 0, 120, "rows_per_beat"),
            (1, 4, 0, "bpm"),
        ];
        for (channels, rpb, bpm, field) in cases {
            let data = file_bytes(1, channels, rpb, bpm, 0, &[]);
            match load_pattern_file(&data) {
                Err(FormatError::InvalidField { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected invalid {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_pattern_path(Path::new("/nonexistent/song.ctrk")).unwrap_err();
        assert!(matches!(err, FormatError::Io(_)));
    }
}
