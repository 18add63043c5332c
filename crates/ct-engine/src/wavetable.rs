//! Interpolated wavetable oscillator with a stepped-noise mode.

use core::f32::consts::{FRAC_PI_2, TAU};

use ct_ir::{Waveform, MAX_CHORUS_VOICES};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Number of entries in a wavetable.
pub const TABLE_SIZE: usize = 24;

const DEFAULT_NOISE_SEED: u64 = 0x5EED_C417;

/// A single-cycle waveform lookup table.
///
/// Tonal shapes are precomputed once in [`set_waveform`](Self::set_waveform)
/// so the per-sample path is a two-point linear interpolation. Noise mode
/// ignores the table and holds a random value for each half cycle. Every
/// chorus voice keeps its own held value and half-cycle flag.
#[derive(Clone, Debug)]
pub struct WaveTable {
    table: [f32; TABLE_SIZE],
    waveform: Waveform,
    noise: bool,
    noise_values: [f32; MAX_CHORUS_VOICES],
    noise_half: [bool; MAX_CHORUS_VOICES],
    seed: u64,
    rng: SmallRng,
}

impl Default for WaveTable {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveTable {
    /// A sine table with the default noise seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_NOISE_SEED)
    }

    /// A sine table whose noise mode draws from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut wt = Self {
            table: [0.0; TABLE_SIZE],
            waveform: Waveform::Sine,
            noise: false,
            noise_values: [0.0; MAX_CHORUS_VOICES],
            noise_half: [false; MAX_CHORUS_VOICES],
            seed,
            rng: SmallRng::seed_from_u64(seed),
        };
        wt.fill(Waveform::Sine);
        wt
    }

    /// Switch shape. `Noise` enables noise mode and leaves the table as is.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        if waveform == Waveform::Noise {
            self.noise = true;
        } else {
            self.noise = false;
            self.fill(waveform);
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn is_noise(&self) -> bool {
        self.noise
    }

    /// The precomputed table entries.
    pub fn table(&self) -> &[f32; TABLE_SIZE] {
        &self.table
    }

    /// Draw a fresh noise value for every voice and restart their half cycles.
    pub fn retrigger_noise(&mut self) {
        for (value, half) in self.noise_values.iter_mut().zip(&mut self.noise_half) {
            *value = self.rng.gen_range(-1.0..=1.0);
            *half = false;
        }
    }

    /// Restart the noise sequence from the seed.
    pub fn reseed(&mut self) {
        self.rng = SmallRng::seed_from_u64(self.seed);
        self.noise_values = [0.0; MAX_CHORUS_VOICES];
        self.noise_half = [false; MAX_CHORUS_VOICES];
    }

    /// Amplitude at normalized position `t` in `[0, 1)` for voice 0.
    #[inline]
    pub fn sample(&mut self, t: f32) -> f32 {
        self.sample_voice(0, t)
    }

    /// Amplitude at `t` for chorus voice `voice`.
    ///
    /// Tonal shapes ignore the voice; noise holds one value per voice.
    #[inline]
    pub fn sample_voice(&mut self, voice: usize, t: f32) -> f32 {
        if self.noise {
            return self.sample_noise(voice.min(MAX_CHORUS_VOICES - 1), t);
        }
        let pos = t * TABLE_SIZE as f32;
        let floor = libm::floorf(pos);
        let index = (floor as i32).rem_euclid(TABLE_SIZE as i32) as usize;
        let next = (index + 1) % TABLE_SIZE;
        let frac = pos - floor;
        (1.0 - frac) * self.table[index] + frac * self.table[next]
    }

    fn sample_noise(&mut self, voice: usize, t: f32) -> f32 {
        let half = t >= 0.5;
        if half != self.noise_half[voice] {
            self.noise_half[voice] = half;
            self.noise_values[voice] = self.rng.gen_range(-1.0..=1.0);
        }
        self.noise_values[voice]
    }

    fn fill(&mut self, waveform: Waveform) {
        for (i, slot) in self.table.iter_mut().enumerate() {
            let t = i as f32 / TABLE_SIZE as f32;
            *slot = shape_at(waveform, t);
        }
    }
}

/// Analytic value of a tonal waveform at `t` in `[0, 1)`.
fn shape_at(waveform: Waveform, t: f32) -> f32 {
    match waveform {
        Waveform::Sine => libm::sinf(TAU * t),
        Waveform::Saw => 2.0 * t - 1.0,
        Waveform::Square => {
            if t < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => 1.0 - libm::acosf(libm::sinf(TAU * t)) / FRAC_PI_2,
        Waveform::Noise => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn sine_quarter_points() {
        let mut wt = WaveTable::new();
        wt.set_waveform(Waveform::Sine);
        assert!(wt.sample(0.0).abs() < EPS);
        assert!((wt.sample(0.25) - 1.0).abs() < EPS);
        assert!(wt.sample(0.5).abs() < EPS);
        assert!((wt.sample(0.75) + 1.0).abs() < EPS);
    }

    #[test]
    fn interpolates_between_entries() {
        let mut wt = WaveTable::new();
        wt.set_waveform(Waveform::Saw);
        let step = 1.0 / TABLE_SIZE as f32;
        let mid = wt.sample(step * 2.5);
        let expected = (wt.table()[2] + wt.table()[3]) / 2.0;
        assert!((mid - expected).abs() < EPS);
    }

    #[test]
    fn last_segment_wraps_to_first_entry() {
        let mut wt = WaveTable::new();
        wt.set_waveform(Waveform::Saw);
        // Between the last entry and entry 0
        let t = (TABLE_SIZE as f32 - 0.5) / TABLE_SIZE as f32;
        let expected = (wt.table()[TABLE_SIZE - 1] + wt.table()[0]) / 2.0;
        assert!((wt.sample(t) - expected).abs() < EPS);
    }

    #[test]
    fn upper_bound_does_not_overrun() {
        let mut wt = WaveTable::new();
        assert!(wt.sample(1.0).abs() < EPS);
        assert!(wt.sample(0.999_999_9).is_finite());
    }

    #[test]
    fn square_splits_at_half() {
        let mut wt = WaveTable::new();
        wt.set_waveform(Waveform::Square);
        assert_eq!(wt.table()[0], 1.0);
        assert_eq!(wt.table()[TABLE_SIZE / 2 - 1], 1.0);
        assert_eq!(wt.table()[TABLE_SIZE / 2], -1.0);
    }

    #[test]
    fn triangle_spans_unit_range() {
        let mut wt = WaveTable::new();
        wt.set_waveform(Waveform::Triangle);
        assert!(wt.sample(0.0).abs() < EPS);
        assert!((wt.sample(0.25) - 1.0).abs() < EPS);
        assert!((wt.sample(0.75) + 1.0).abs() < EPS);
        assert!(wt.table().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn noise_holds_within_half_cycle() {
        let mut wt = WaveTable::with_seed(7);
        wt.set_waveform(Waveform::Noise);
        assert!(wt.is_noise());
        let a = wt.sample(0.55);
        assert_eq!(wt.sample(0.6), a);
        assert_eq!(wt.sample(0.9), a);
        let b = wt.sample(0.1);
        assert_eq!(wt.sample(0.3), b);
        assert!((-1.0..=1.0).contains(&a));
        assert!((-1.0..=1.0).contains(&b));
    }

    #[test]
    fn noise_rerolls_on_each_half() {
        let mut wt = WaveTable::with_seed(42);
        wt.set_waveform(Waveform::Noise);
        let mut values = [0.0f32; 8];
        for (i, v) in values.iter_mut().enumerate() {
            *v = wt.sample(if i % 2 == 0 { 0.6 } else { 0.1 });
        }
        let distinct = values.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(distinct >= 6, "noise barely changed: {values:?}");
    }

    #[test]
    fn noise_is_reproducible_per_seed() {
        let mut a = WaveTable::with_seed(99);
        let mut b = WaveTable::with_seed(99);
        a.set_waveform(Waveform::Noise);
        b.set_waveform(Waveform::Noise);
        for i in 0..32 {
            let t = (i % 4) as f32 / 4.0;
            assert_eq!(a.sample(t), b.sample(t));
        }
    }

    #[test]
    fn noise_voices_hold_independently() {
        let mut wt = WaveTable::with_seed(3);
        wt.set_waveform(Waveform::Noise);
        let first = wt.sample_voice(0, 0.6);
        // Voice 1 alternating halves must not disturb voice 0
        for i in 0..16 {
            wt.sample_voice(1, if i % 2 == 0 { 0.6 } else { 0.1 });
            assert_eq!(wt.sample_voice(0, 0.7), first);
        }
    }

    #[test]
    fn retrigger_draws_fresh_values() {
        let mut wt = WaveTable::with_seed(5);
        wt.set_waveform(Waveform::Noise);
        wt.retrigger_noise();
        let a = wt.sample_voice(0, 0.1);
        let b = wt.sample_voice(1, 0.1);
        assert_ne!(a, 0.0);
        assert_ne!(b, 0.0);
        assert_ne!(a, b);
    }

    #[test]
    fn reseed_replays_noise_sequence() {
        let mut wt = WaveTable::with_seed(11);
        wt.set_waveform(Waveform::Noise);
        let alternate = |wt: &mut WaveTable| -> [f32; 8] {
            core::array::from_fn(|i| wt.sample(if i % 2 == 0 { 0.6 } else { 0.1 }))
        };
        let first = alternate(&mut wt);
        wt.reseed();
        assert_eq!(alternate(&mut wt), first);
    }

    #[test]
    fn leaving_noise_restores_tonal_lookup() {
        let mut wt = WaveTable::new();
        wt.set_waveform(Waveform::Noise);
        wt.set_waveform(Waveform::Sine);
        assert!(!wt.is_noise());
        assert!((wt.sample(0.25) - 1.0).abs() < EPS);
    }
}
