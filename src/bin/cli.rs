//! chiptrack CLI: headless playback and WAV export.
//!
//! Usage:
//!   ct-cli                          play the demo song
//!   ct-cli --pattern song.ctrk      play a pattern file
//!   ct-cli --wav out.wav            render to 8-bit WAV instead
//!
//! Set `RUST_LOG=debug` for engine and device details.

#[cfg(feature = "alloc_check")]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

use clap::Parser;
use ct_master::{Controller, EngineConfig};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Wavetable chiptune synthesizer and tracker
#[derive(Parser)]
#[command(name = "ct-cli", version, about)]
struct Args {
    /// TOML engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Tempo override in beats per minute
    #[arg(long)]
    bpm: Option<f32>,
    /// Master volume override
    #[arg(long)]
    volume: Option<f32>,
    /// Pattern file to play instead of the demo song
    #[arg(short, long)]
    pattern: Option<PathBuf>,
    /// Render to this WAV file instead of playing
    #[arg(long)]
    wav: Option<PathBuf>,
    /// Maximum render length in seconds
    #[arg(long, default_value_t = 300)]
    seconds: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let sample_rate = config.sample_rate;

    let mut ctrl = Controller::new(config);
    if let Some(path) = &args.pattern {
        ctrl.load_pattern_path(path)?;
    }
    if let Some(bpm) = args.bpm {
        ctrl.set_bpm(bpm);
    }
    if let Some(volume) = args.volume {
        ctrl.set_master_volume(volume);
    }

    let song = ctrl.song();
    println!("Title:       {}", song.title);
    println!("Channels:    {}", song.channel_count());
    println!("Instruments: {}", song.instruments.len());
    println!("Patterns:    {}", song.patterns.len());
    println!("Tempo:       {} BPM, {} rows/beat", song.bpm, song.rows_per_beat);
    println!("Length:      {} beats", song.total_time().as_beats());
    println!();

    match &args.wav {
        Some(path) => render_to_wav(&ctrl, path, sample_rate, args.seconds)?,
        None => play_audio(&mut ctrl),
    }
    Ok(())
}

fn play_audio(ctrl: &mut Controller) {
    ctrl.play();
    println!("Playing...");

    while ctrl.is_playing() {
        if let Some(beats) = ctrl.position() {
            print!("\rBeat: {beats:7.2}");
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    println!("\rDone.          ");
}

fn render_to_wav(
    ctrl: &Controller,
    path: &Path,
    sample_rate: u32,
    max_seconds: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Rendering to {} at {} Hz...", path.display(), sample_rate);
    let wav = ctrl.render_to_wav(sample_rate, max_seconds)?;
    std::fs::write(path, &wav)?;
    log::info!("wrote {} bytes to {}", wav.len(), path.display());
    println!("Done.");
    Ok(())
}
