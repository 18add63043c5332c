//! Per-sample ADSR envelope generator.

use ct_ir::Adsr;

/// Stage durations at or below this are instantaneous.
const MIN_STAGE_SECONDS: f32 = 1e-5;

/// Release ends once the level falls to this.
const SILENCE_LEVEL: f32 = 1e-5;

/// Envelope stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    #[default]
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Linear ADSR state machine advanced once per output sample.
///
/// Timing is counted in calls to [`sample`](Self::sample), so the same
/// sample rate must be passed every time.
#[derive(Clone, Debug, Default)]
pub struct EnvelopeGenerator {
    params: Adsr,
    stage: EnvelopeStage,
    out: f32,
}

impl EnvelopeGenerator {
    /// Idle envelope with a flat shape (sustain 1, instant stages).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: Adsr) -> Self {
        Self { params: params.sanitized(), ..Self::default() }
    }

    pub fn params(&self) -> Adsr {
        self.params
    }

    pub fn set_params(&mut self, params: Adsr) {
        self.params = params.sanitized();
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current output level without advancing.
    pub fn level(&self) -> f32 {
        self.out
    }

    pub fn is_idle(&self) -> bool {
        self.stage == EnvelopeStage::Idle
    }

    /// Gate on restarts Attack from the current level; gate off releases.
    pub fn gate(&mut self, on: bool) {
        if on {
            self.stage = EnvelopeStage::Attack;
        } else if self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Drop straight to silence.
    pub fn kill(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.out = 0.0;
    }

    /// Advance one sample and return the new level.
    #[inline]
    pub fn sample(&mut self, sample_rate: f32) -> f32 {
        let p = &self.params;
        match self.stage {
            EnvelopeStage::Idle => self.out = 0.0,
            EnvelopeStage::Attack => {
                if p.attack <= MIN_STAGE_SECONDS {
                    self.out = 1.0;
                } else {
                    self.out += 1.0 / p.attack / sample_rate;
                }
                if self.out >= 1.0 {
                    self.out = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                if p.decay > MIN_STAGE_SECONDS {
                    self.out -= 1.0 / p.decay / sample_rate;
                }
                if p.decay <= MIN_STAGE_SECONDS || self.out <= p.sustain {
                    self.out = p.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => self.out = p.sustain,
            EnvelopeStage::Release => {
                if p.release <= MIN_STAGE_SECONDS {
                    self.out = 0.0;
                } else {
                    self.out -= 1.0 / p.release / sample_rate;
                }
                if self.out <= SILENCE_LEVEL {
                    self.out = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    fn run(env: &mut EnvelopeGenerator, n: usize) -> f32 {
        let mut last = env.level();
        for _ in 0..n {
            last = env.sample(SR);
        }
        last
    }

    #[test]
    fn starts_idle_and_silent() {
        let mut env = EnvelopeGenerator::new();
        assert!(env.is_idle());
        assert_eq!(run(&mut env, 10), 0.0);
    }

    #[test]
    fn attack_reaches_full_after_attack_time() {
        let mut env = EnvelopeGenerator::with_params(Adsr::new(0.01, 0.0, 1.0, 0.1));
        env.gate(true);
        let calls = (0.01 * SR).ceil() as usize;
        let before = run(&mut env, calls - 2);
        assert!(before < 0.999, "rose too early: {before}");
        let at = run(&mut env, 2);
        assert!((at - 1.0).abs() < 1e-3, "level after attack {at}");
    }

    #[test]
    fn sustain_holds_until_gate_off_then_release_completes() {
        let mut env = EnvelopeGenerator::with_params(Adsr::new(0.01, 0.0, 1.0, 0.1));
        env.gate(true);
        run(&mut env, 441 + 2);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert_eq!(run(&mut env, 10_000), 1.0);

        env.gate(false);
        assert_eq!(env.stage(), EnvelopeStage::Release);
        let release_calls = (0.1 * SR).ceil() as usize;
        let mid = run(&mut env, release_calls / 2);
        assert!((mid - 0.5).abs() < 0.01, "mid-release level {mid}");
        let end = run(&mut env, release_calls / 2 + 2);
        assert!(end < 1e-3);
        assert!(env.is_idle());
    }

    #[test]
    fn decay_falls_to_sustain_level() {
        let mut env = EnvelopeGenerator::with_params(Adsr::new(0.0, 0.01, 0.4, 0.0));
        env.gate(true);
        assert_eq!(env.sample(SR), 1.0);
        assert_eq!(env.stage(), EnvelopeStage::Decay);
        let mut prev = 1.0;
        for _ in 0..1000 {
            let v = env.sample(SR);
            assert!(v <= prev, "decay must not rise");
            prev = v;
        }
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert!((prev - 0.4).abs() < 1e-6);
    }

    #[test]
    fn zero_length_stages_are_instant() {
        let mut env = EnvelopeGenerator::new();
        env.gate(true);
        assert_eq!(env.sample(SR), 1.0);
        assert_eq!(env.sample(SR), 1.0);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        env.gate(false);
        assert_eq!(env.sample(SR), 0.0);
        assert!(env.is_idle());
    }

    #[test]
    fn retrigger_attacks_from_current_level() {
        let mut env = EnvelopeGenerator::with_params(Adsr::new(0.1, 0.0, 1.0, 0.1));
        env.gate(true);
        let level = run(&mut env, 2205);
        assert!((level - 0.5).abs() < 0.01);
        env.gate(true);
        let next = env.sample(SR);
        assert!(next > level, "re-attack restarted from zero");
    }

    #[test]
    fn gate_off_while_idle_stays_idle() {
        let mut env = EnvelopeGenerator::new();
        env.gate(false);
        assert!(env.is_idle());
    }

    #[test]
    fn kill_silences_immediately() {
        let mut env = EnvelopeGenerator::with_params(Adsr::new(0.0, 0.0, 1.0, 1.0));
        env.gate(true);
        run(&mut env, 4);
        env.kill();
        assert!(env.is_idle());
        assert_eq!(env.level(), 0.0);
    }
}
