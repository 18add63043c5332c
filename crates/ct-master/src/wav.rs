//! 8-bit mono WAV export.

use std::io::{Cursor, Seek, Write};

use ct_engine::quantize_u8;
use hound::{SampleFormat, WavSpec, WavWriter};

fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 8,
        sample_format: SampleFormat::Int,
    }
}

/// Write samples as unsigned 8-bit PCM.
pub fn write_wav<W: Write + Seek>(
    w: W,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let mut writer = WavWriter::new(w, wav_spec(sample_rate))?;
    for &s in samples {
        // hound stores 8-bit samples offset by 128
        writer.write_sample((quantize_u8(s) as i16 - 128) as i8)?;
    }
    writer.finalize()
}

/// Encode samples into an in-memory WAV file.
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, samples, sample_rate)?;
    Ok(cursor.into_inner())
}
