//! Synthetic audio test fixtures for development and testing
//!
//! Deterministic signals with known spectral content, plus helpers that write
//! them to temporary WAV files so loading can be tested without committing
//! binary assets.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::f32::consts::PI;
use std::fs::File;
use std::io::BufWriter;
use tempfile::NamedTempFile;

/// Generate a pure sine wave at the given frequency
///
/// # Arguments
/// * `frequency` - Frequency in Hz (e.g., 440.0 for A4)
/// * `duration_secs` - Duration in seconds
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `amplitude` - Peak amplitude, 0.0 to 1.0
///
/// # Example
/// ```
/// use spectrum_visualizer::test_fixtures::generate_sine_wave;
/// let tone = generate_sine_wave(440.0, 1.0, 44100, 0.5);
/// assert_eq!(tone.len(), 44100);
/// ```
pub fn generate_sine_wave(
    frequency: f32,
    duration_secs: f32,
    sample_rate: u32,
    amplitude: f32,
) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Deterministic pseudo-random noise in `[-amplitude, amplitude]`.
pub fn generate_white_noise(num_samples: usize, amplitude: f32) -> Vec<f32> {
    let mut state = 0x2545_f491_u32;
    (0..num_samples)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let unit = (state >> 8) as f32 / (1u32 << 24) as f32;
            amplitude * (unit * 2.0 - 1.0)
        })
        .collect()
}

/// Interleave two equal-length channels into one stereo buffer.
pub fn interleave(left: &[f32], right: &[f32]) -> Vec<f32> {
    left.iter()
        .zip(right)
        .flat_map(|(&l, &r)| [l, r])
        .collect()
}

/// Write a WAV file with `spec` into a temporary file, filling it with `fill`.
pub fn write_wav<F>(spec: WavSpec, fill: F) -> NamedTempFile
where
    F: FnOnce(&mut WavWriter<BufWriter<File>>) -> hound::Result<()>,
{
    let file = NamedTempFile::new().expect("create temp file");
    let mut writer = WavWriter::create(file.path(), spec).expect("create wav writer");
    fill(&mut writer).expect("write samples");
    writer.finalize().expect("finalize wav");
    file
}

/// Write `samples` as a 16-bit PCM WAV file.
///
/// Samples are interleaved when `channels` is 2.
pub fn create_test_wav_file(samples: &[f32], sample_rate: u32, channels: u16) -> NamedTempFile {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    write_wav(spec, |writer| {
        for &sample in samples {
            writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        Ok(())
    })
}
