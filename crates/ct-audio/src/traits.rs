//! Audio output trait and error types.

use thiserror::Error;

/// Error type for audio operations.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("device init error: {0}")]
    DeviceInit(String),
    #[error("stream create error: {0}")]
    StreamCreate(String),
    #[error("playback error: {0}")]
    Playback(String),
    #[error("no audio device available")]
    NoDevice,
}

/// A sink for mono `f32` samples.
pub trait AudioOutput {
    /// Device sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Queue samples without blocking. Samples that do not fit are dropped;
    /// returns how many were queued.
    fn write(&mut self, samples: &[f32]) -> usize;

    /// Start playback.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Pause playback. Queued samples are kept.
    fn stop(&mut self) -> Result<(), AudioError>;
}
