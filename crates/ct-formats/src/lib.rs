//! File formats for the chiptrack synthesizer.
//!
//! Parses `.ctrk` pattern files into the IR.

mod pattern_file;

pub use pattern_file::{load_pattern_file, load_pattern_path, PatternFile, MAX_FILE_CHANNELS};

use thiserror::Error;

/// Error type for format parsing.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Magic bytes missing or wrong
    #[error("not a pattern file (bad magic)")]
    InvalidHeader,
    /// File ends before the declared data
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("unsupported pattern file version {0}")]
    UnsupportedVersion(u8),
    /// A header field is out of range
    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: u32 },
    #[error("parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
