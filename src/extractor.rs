//! Spectral frame extraction synchronized to playback time.
//!
//! Each tick reads one frame of samples at the playback cursor, folds stereo
//! to mono, applies a Hann window and transforms it. A tick that cannot be
//! served from the available samples is skipped and the previous bins stay
//! exactly as they were.

use crate::analysis::{bin_frequencies, hann_window};
use crate::error::ExtractorError;
use crate::fft::{self, DEFAULT_FORWARD_SCALE};
use num_complex::Complex64;

/// Read view of decoded audio owned by the playback side.
///
/// Samples are interleaved when `channels() == 2`.
pub trait SampleSource {
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
    fn samples(&self) -> &[f32];
}

/// Result of a single [`SpectralExtractor::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The bins now hold the spectrum of the frame at the cursor.
    Updated,
    /// Not enough samples ahead of the cursor; the bins were left untouched.
    Starved,
}

impl TickOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

#[derive(Debug, Clone)]
pub struct SpectralExtractor {
    frame_size: usize,
    sample_rate: u32,
    channels: u16,
    window: Vec<f64>,
    bin_frequencies: Vec<f64>,
    bins: Vec<Complex64>,
    /// Frame being assembled; swapped with `bins` once the transform succeeds.
    scratch: Vec<Complex64>,
}

impl SpectralExtractor {
    /// Create an extractor for `frame_size`-point frames.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::ZeroFrameSize`], [`ExtractorError::FrameSizeNotPowerOfTwo`]
    /// or [`ExtractorError::ZeroSampleRate`]. Channel counts other than two are
    /// read as mono.
    pub fn new(frame_size: usize, sample_rate: u32, channels: u16) -> Result<Self, ExtractorError> {
        if frame_size == 0 {
            return Err(ExtractorError::ZeroFrameSize);
        }
        if !frame_size.is_power_of_two() {
            return Err(ExtractorError::FrameSizeNotPowerOfTwo { frame_size });
        }
        if sample_rate == 0 {
            return Err(ExtractorError::ZeroSampleRate);
        }

        Ok(Self {
            frame_size,
            sample_rate,
            channels,
            window: hann_window(frame_size),
            bin_frequencies: bin_frequencies(frame_size, sample_rate),
            bins: vec![Complex64::default(); frame_size],
            scratch: vec![Complex64::default(); frame_size],
        })
    }

    /// Create an extractor matching the format of `source`.
    pub fn for_source<S: SampleSource + ?Sized>(
        source: &S,
        frame_size: usize,
    ) -> Result<Self, ExtractorError> {
        Self::new(frame_size, source.sample_rate(), source.channels())
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Bins from the last successful tick. All zero before the first one.
    pub fn bins(&self) -> &[Complex64] {
        &self.bins
    }

    /// Frequency in Hz of each bin.
    pub fn bin_frequencies(&self) -> &[f64] {
        &self.bin_frequencies
    }

    pub fn window(&self) -> &[f64] {
        &self.window
    }

    fn stride(&self) -> usize {
        channel_stride(self.channels)
    }

    /// Index into the interleaved sample buffer of the frame starting at
    /// `playback_secs`, or `None` for a negative or non-finite position.
    ///
    /// Stereo frames always start on a left-channel sample.
    pub fn start_index(&self, playback_secs: f64) -> Option<usize> {
        if !playback_secs.is_finite() || playback_secs < 0.0 {
            return None;
        }
        let frame = (playback_secs * self.sample_rate as f64) as usize;
        frame.checked_mul(self.stride())
    }

    /// Recompute the bins for the frame at `playback_secs`.
    pub fn tick(&mut self, samples: &[f32], playback_secs: f64) -> TickOutcome {
        let stride = self.stride();
        let Some(start) = self.start_index(playback_secs) else {
            tracing::trace!(playback_secs, "Playback position out of range, skipping tick");
            return TickOutcome::Starved;
        };
        let Some(input) = frame_slice(samples, start, self.frame_size, stride) else {
            tracing::trace!(
                start,
                available = samples.len(),
                "Not enough samples ahead of cursor, skipping tick"
            );
            return TickOutcome::Starved;
        };

        for ((slot, value), weight) in self
            .scratch
            .iter_mut()
            .zip(mono_values(input, stride))
            .zip(&self.window)
        {
            *slot = Complex64::new(value * weight, 0.0);
        }

        if let Err(err) = fft::forward(&mut self.scratch, DEFAULT_FORWARD_SCALE) {
            tracing::error!(%err, "Transform rejected frame");
            return TickOutcome::Starved;
        }
        std::mem::swap(&mut self.bins, &mut self.scratch);
        TickOutcome::Updated
    }

    /// [`tick`](Self::tick) against a [`SampleSource`].
    pub fn tick_source<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
        playback_secs: f64,
    ) -> TickOutcome {
        self.tick(source.samples(), playback_secs)
    }
}

fn channel_stride(channels: u16) -> usize {
    if channels == 2 {
        2
    } else {
        1
    }
}

fn frame_slice(samples: &[f32], start: usize, frame_size: usize, stride: usize) -> Option<&[f32]> {
    let end = frame_size
        .checked_mul(stride)
        .and_then(|len| start.checked_add(len))?;
    samples.get(start..end)
}

fn mono_values(input: &[f32], stride: usize) -> impl Iterator<Item = f64> + '_ {
    input.chunks_exact(stride).map(move |chunk| {
        if stride == 2 {
            (chunk[0] as f64 + chunk[1] as f64) / 2.0
        } else {
            chunk[0] as f64
        }
    })
}

/// The un-windowed mono frame a tick would transform, or `None` when the
/// frame runs past the end of `samples`.
pub fn downmix_frame(
    samples: &[f32],
    start: usize,
    frame_size: usize,
    channels: u16,
) -> Option<Vec<f64>> {
    let stride = channel_stride(channels);
    let input = frame_slice(samples, start, frame_size, stride)?;
    Some(mono_values(input, stride).collect())
}
