//! Output quantization.

/// Map a sample to unsigned 8-bit PCM.
///
/// Input is clamped to `[-1, 1]`; `-1 → 0`, `0 → 128`, `1 → 255`.
#[inline]
pub fn quantize_u8(sample: f32) -> u8 {
    let clamped = if sample.is_nan() { 0.0 } else { sample.clamp(-1.0, 1.0) };
    libm::roundf((clamped * 0.5 + 0.5) * 255.0) as u8
}
