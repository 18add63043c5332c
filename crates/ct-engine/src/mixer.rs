//! Multi-channel tracker: global clock, channel blend and master volume.

use ct_ir::Sound;
use heapless::Vec;

use crate::channel::Channel;
use crate::instrument::InstrumentBank;

/// Upper bound on tracker channels.
pub const MAX_CHANNELS: usize = 8;

/// Screen blend of two signals: `a + b - a·b`.
///
/// Outside `[0, 1]` the result is order dependent and can exceed unity;
/// the tracker applies it to signed samples as is.
#[inline]
pub fn mix(a: f32, b: f32) -> f32 {
    a + b - a * b
}

/// Beats advanced per output sample.
#[inline]
pub fn beat_step(bpm: f32, beat_unit: f32, sample_rate: f32) -> f32 {
    bpm * beat_unit / (60.0 * sample_rate)
}

/// Owns the channels and mixes them down to one signal.
#[derive(Clone, Debug)]
pub struct Tracker {
    channels: Vec<Channel, MAX_CHANNELS>,
    /// Output sample rate in Hz
    sample_rate: f32,
    /// Final gain applied after blending
    master_volume: f32,
    /// Beats elapsed since construction
    time: f64,
}

impl Tracker {
    /// Create a tracker with `channels` channels (clamped to `MAX_CHANNELS`).
    pub fn new(channels: usize, sample_rate: f32) -> Self {
        let mut bank = Vec::new();
        for _ in 0..channels.min(MAX_CHANNELS) {
            let _ = bank.push(Channel::new());
        }
        Self {
            channels: bank,
            sample_rate,
            master_volume: 1.0,
            time: 0.0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.max(0.0);
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Beats elapsed across all `sample` calls.
    pub fn elapsed_beats(&self) -> f64 {
        self.time
    }

    /// Trigger `sound` on a channel. Out-of-range channels are ignored.
    pub fn play(&mut self, channel: usize, sound: Sound, instruments: &mut InstrumentBank) {
        if let Some(ch) = self.channels.get_mut(channel) {
            ch.play(sound, instruments);
        }
    }

    /// Release a channel's gate.
    pub fn stop(&mut self, channel: usize, instruments: &mut InstrumentBank) {
        if let Some(ch) = self.channels.get_mut(channel) {
            ch.stop(instruments);
        }
    }

    /// Cut every channel immediately.
    pub fn silence(&mut self, instruments: &mut InstrumentBank) {
        for ch in self.channels.iter_mut() {
            ch.kill(instruments);
        }
    }

    /// True if any channel's instrument is still sounding.
    pub fn is_audible(&self, instruments: &InstrumentBank) -> bool {
        self.channels.iter().any(|ch| ch.is_audible(instruments))
    }

    /// Render one output sample.
    pub fn sample(&mut self, instruments: &mut InstrumentBank, bpm: f32, beat_unit: f32) -> f32 {
        let step = beat_step(bpm, beat_unit, self.sample_rate);
        let sample_rate = self.sample_rate;
        let mut out = 0.0;
        for ch in self.channels.iter_mut() {
            out = mix(out, ch.sample(instruments, bpm, step, sample_rate));
        }
        self.time += step as f64;
        out * self.master_volume
    }
}
