use crate::error::{AudioError, Result};
use crate::extractor::SampleSource;
use hound::{SampleFormat, WavReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Decoded audio held as one interleaved buffer of normalized `f32` samples.
///
/// The buffer is an `Arc<[f32]>` so the clip can be cloned cheaply into
/// anything that needs a read view of it while the analyzer keeps its own.
/// Once loaded the samples never change, which is what lets the extractor
/// read them without synchronization.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Interleaved samples in `[-1.0, 1.0]`.
    samples: Arc<[f32]>,
    /// Sample rate in Hz (e.g., 44100, 48000).
    sample_rate: u32,
    /// 1 for mono, 2 for stereo.
    channels: u16,
}

impl AudioClip {
    /// Wrap already-decoded interleaved samples.
    pub fn from_samples(samples: impl Into<Arc<[f32]>>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
            channels,
        }
    }

    /// A clip with no samples. Every extractor tick against it starves.
    pub fn silent(sample_rate: u32, channels: u16) -> Self {
        Self::from_samples(Vec::new(), sample_rate, channels)
    }

    /// Load and decode a WAV file.
    ///
    /// Integer PCM of 8 to 32 bits and 32-bit float are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::LoadFailed`] if the file cannot be opened or read.
    /// Returns [`AudioError::UnsupportedChannels`] for files with > 2 channels.
    /// Returns [`AudioError::InvalidSampleRate`] for sample rates outside 8kHz-192kHz.
    /// Returns [`AudioError::UnsupportedFormat`] for other sample encodings.
    /// Returns [`AudioError::EmptyFile`] if the file contains no audio samples.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spectrum_visualizer::audio::AudioClip;
    ///
    /// let clip = AudioClip::from_file("song.wav")?;
    /// println!("Loaded {} samples at {} Hz", clip.sample_count(), clip.sample_rate());
    /// # Ok::<(), spectrum_visualizer::error::SpectrumError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let load_failed = |source| AudioError::LoadFailed {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = WavReader::open(path).map_err(load_failed)?;
        let spec = reader.spec();

        if !(8000..=192_000).contains(&spec.sample_rate) {
            return Err(AudioError::InvalidSampleRate {
                rate: spec.sample_rate,
            });
        }

        if spec.channels != 1 && spec.channels != 2 {
            return Err(AudioError::UnsupportedChannels {
                channels: spec.channels,
            });
        }

        let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(load_failed)?,
            (SampleFormat::Int, bits @ 1..=32) => {
                let full_scale = (1u64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(load_failed)?
            }
            (format, bits) => {
                return Err(AudioError::UnsupportedFormat {
                    bits,
                    format: match format {
                        SampleFormat::Float => "float",
                        SampleFormat::Int => "integer",
                    },
                });
            }
        };

        if samples.is_empty() {
            return Err(AudioError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        tracing::info!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            samples = samples.len(),
            "Successfully loaded WAV file"
        );

        Ok(Self::from_samples(samples, spec.sample_rate, spec.channels))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels
    }

    /// Total samples across all channels.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Playing time of the clip.
    pub fn duration(&self) -> Duration {
        let frames_per_sec = self.sample_rate as f64 * self.channels.max(1) as f64;
        if frames_per_sec == 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / frames_per_sec)
    }
}

impl SampleSource for AudioClip {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn samples(&self) -> &[f32] {
        &self.samples
    }
}
