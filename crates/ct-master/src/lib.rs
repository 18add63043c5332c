//! Headless controller for the chiptrack synthesizer.
//!
//! Owns the configuration and the current song, runs real-time playback
//! on a dedicated thread, and renders offline for WAV export.

mod config;
mod demo;
mod wav;

use ct_audio::{AudioError, AudioOutput, CpalOutput};
use ct_engine::Player;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;

// Re-export common types so callers don't need ct-ir/ct-engine directly.
pub use config::{ConfigError, EngineConfig};
pub use ct_formats::FormatError;
pub use ct_ir::{InstrumentParams, Song};
pub use demo::{apply_instruments, demo_instruments, demo_song};
pub use wav::{samples_to_wav, write_wav};

#[derive(Debug, Error)]
pub enum MasterError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("wav export failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Headless controller: owns a song and manages playback.
pub struct Controller {
    config: EngineConfig,
    song: Song,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    /// Playback position in beats, as `f64` bits
    position: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    /// Create a controller playing the demo song.
    pub fn new(config: EngineConfig) -> Self {
        let song = demo_song(&config);
        Self { config, song, playback: None }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Song management ---

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn song_mut(&mut self) -> &mut Song {
        &mut self.song
    }

    /// Load a pattern file. Channels get the configured instruments.
    pub fn load_pattern(&mut self, data: &[u8]) -> Result<(), MasterError> {
        let song = ct_formats::load_pattern_file(data)?;
        self.set_pattern_song(song);
        Ok(())
    }

    pub fn load_pattern_path(&mut self, path: &Path) -> Result<(), MasterError> {
        let song = ct_formats::load_pattern_path(path)?;
        self.set_pattern_song(song);
        Ok(())
    }

    fn set_pattern_song(&mut self, mut song: Song) {
        self.stop();
        song.beat_unit = self.config.beat_unit;
        song.master_volume = self.config.master_volume;
        song.instruments = demo_instruments();
        apply_instruments(&mut song, &self.config.instruments);
        log::info!(
            "loaded \"{}\": {} channels, {} beats at {} bpm",
            song.title,
            song.channel_count(),
            song.total_time().as_beats(),
            song.bpm
        );
        self.song = song;
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        if bpm > 0.0 {
            self.song.bpm = bpm;
        }
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.song.master_volume = volume.max(0.0);
    }

    // --- Real-time playback ---

    pub fn play(&mut self) {
        self.stop();

        let song = self.song.clone();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let position = Arc::new(AtomicU64::new(0f64.to_bits()));
        let finished = Arc::new(AtomicBool::new(false));

        let stop = stop_signal.clone();
        let pos = position.clone();
        let done = finished.clone();

        let thread = std::thread::spawn(move || {
            if let Err(e) = audio_thread(&song, &stop, &pos) {
                log::error!("playback failed: {e}");
            }
            done.store(true, Ordering::Relaxed);
        });

        self.playback = Some(PlaybackHandle {
            stop_signal,
            position,
            finished,
            thread: Some(thread),
        });
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
            log::debug!("playback stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    /// Current playback position in beats.
    pub fn position(&self) -> Option<f64> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(f64::from_bits(pb.position.load(Ordering::Relaxed)))
    }

    // --- Offline rendering ---

    /// Render the song until it finishes or `max_samples` is reached.
    pub fn render_samples(&self, sample_rate: u32, max_samples: usize) -> Vec<f32> {
        let mut player = Player::new(&self.song, sample_rate as f32);
        player.play();

        let mut samples = Vec::with_capacity(max_samples);
        while !player.is_finished() && samples.len() < max_samples {
            samples.push(player.render_sample());
        }
        log::debug!(
            "rendered {} samples ({:.2} beats)",
            samples.len(),
            player.position()
        );
        samples
    }

    /// Render to an in-memory 8-bit mono WAV file.
    pub fn render_to_wav(
        &self,
        sample_rate: u32,
        max_seconds: u32,
    ) -> Result<Vec<u8>, MasterError> {
        let max_samples = sample_rate as usize * max_seconds as usize;
        let samples = self.render_samples(sample_rate, max_samples);
        Ok(samples_to_wav(&samples, sample_rate)?)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn audio_thread(
    song: &Song,
    stop_signal: &AtomicBool,
    position: &AtomicU64,
) -> Result<(), AudioError> {
    let (mut output, consumer) = CpalOutput::new()?;
    let sample_rate = output.sample_rate();
    let mut player = Player::new(song, sample_rate as f32);
    player.play();

    output.build_stream(consumer)?;
    output.start()?;
    log::info!("playing \"{}\" at {} Hz", song.title, sample_rate);

    let report_interval = (sample_rate / 100).max(1) as u64;
    let mut count: u64 = 0;

    while !player.is_finished() && !stop_signal.load(Ordering::Relaxed) {
        #[cfg(feature = "alloc_check")]
        let sample = assert_no_alloc::assert_no_alloc(|| player.render_sample());
        #[cfg(not(feature = "alloc_check"))]
        let sample = player.render_sample();

        output.write_spin(sample);
        count += 1;
        if count % report_interval == 0 {
            position.store(player.position().to_bits(), Ordering::Relaxed);
        }
    }

    // Let the device drain before the stream is dropped.
    if !stop_signal.load(Ordering::Relaxed) {
        for _ in 0..sample_rate / 4 {
            output.write_spin(0.0);
        }
    }
    output.stop()?;
    Ok(())
}
