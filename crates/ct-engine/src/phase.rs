//! Wrapping phase accumulator.

use core::f32::consts::TAU;

/// Oscillator phase in radians, kept in `[0, 2π)`.
///
/// Negative frequencies are not supported: only forward overflow wraps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseAccumulator {
    phase: f32,
}

impl PhaseAccumulator {
    pub const fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Return the current phase, then step it by one sample of `frequency`.
    #[inline]
    pub fn advance(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let previous = self.phase;
        self.phase += TAU * frequency / sample_rate;
        // One subtraction is enough while frequency stays below sample_rate.
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        previous
    }

    /// Like [`advance`](Self::advance), scaled to `[0, 1)`.
    #[inline]
    pub fn normalized(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        self.advance(frequency, sample_rate) / TAU
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Current phase in radians.
    pub fn phase(&self) -> f32 {
        self.phase
    }
}
