//! A clip, its playback cursor and a spectral extractor driven together.
//!
//! [`SpectrumPlayer::update`] is meant to be called once per rendered frame
//! from the thread that owns the player.

use crate::analysis::{self, Peak};
use crate::audio::AudioClip;
use crate::audio_state::{PlaybackClock, PlaybackStatus};
use crate::config::AppConfig;
use crate::error::{ExtractorError, Result};
use crate::extractor::{SpectralExtractor, TickOutcome};
use crate::metrics::AnalysisMetrics;
use num_complex::Complex64;
use std::path::Path;
use std::time::{Duration, Instant};

/// Sample rate assumed for the silent clip that stands in for a file that
/// failed to load.
const FALLBACK_SAMPLE_RATE: u32 = 44100;

pub struct SpectrumPlayer {
    clip: AudioClip,
    clock: PlaybackClock,
    extractor: SpectralExtractor,
    metrics: Option<AnalysisMetrics>,
}

impl SpectrumPlayer {
    /// Wrap an already-loaded clip. The clock starts stopped and not looping.
    pub fn new(clip: AudioClip, frame_size: usize) -> Result<Self, ExtractorError> {
        let extractor = SpectralExtractor::for_source(&clip, frame_size)?;
        let clock = PlaybackClock::new(clip.duration());
        Ok(Self {
            clip,
            clock,
            extractor,
            metrics: None,
        })
    }

    /// Load `path` and configure the player from `config`.
    ///
    /// A file that cannot be loaded is logged and replaced by a silent clip,
    /// so every tick starves and the bins stay at zero. Only an invalid frame
    /// size is an error.
    pub fn open<P: AsRef<Path>>(path: P, config: &AppConfig) -> Result<Self> {
        let path = path.as_ref();
        let clip = AudioClip::from_file(path).unwrap_or_else(|err| {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                reason = %err.user_message(),
                "Unable to load audio, visualizing silence"
            );
            AudioClip::silent(FALLBACK_SAMPLE_RATE, 1)
        });

        let mut player = Self::new(clip, config.analyzer.frame_size)?;
        player.set_looping(config.playback.looping);
        player.set_volume(config.playback.volume);
        if config.metrics.enabled {
            player.metrics = Some(AnalysisMetrics::with_config(&config.metrics));
        }
        Ok(player)
    }

    pub fn metrics(&self) -> Option<&AnalysisMetrics> {
        self.metrics.as_ref()
    }

    /// Recompute the bins for the current playback position.
    pub fn update_at(&mut self, now: Instant) -> TickOutcome {
        let offset = self.clock.playing_offset_at(now);
        self.update_at_offset(offset)
    }

    pub fn update(&mut self) -> TickOutcome {
        self.update_at(Instant::now())
    }

    /// Recompute the bins for the frame starting `offset_secs` into the clip.
    pub fn update_at_offset(&mut self, offset_secs: f64) -> TickOutcome {
        let started = Instant::now();
        let outcome = self.extractor.tick_source(&self.clip, offset_secs);
        if let Some(metrics) = self.metrics.as_mut() {
            metrics.record_tick(outcome, started.elapsed());
        }
        tracing::trace!(offset_secs, ?outcome, "Spectrum tick");
        outcome
    }

    pub fn bins(&self) -> &[Complex64] {
        self.extractor.bins()
    }

    pub fn bin_frequencies(&self) -> &[f64] {
        self.extractor.bin_frequencies()
    }

    /// Bar heights for the current bins.
    pub fn bar_heights(&self, bar_count: usize, intensity: f32, max_height: f32) -> Vec<f32> {
        analysis::bar_heights(self.bins(), bar_count, intensity, max_height)
    }

    /// Strongest peaks in the current bins.
    pub fn peaks(&self, count: usize) -> Vec<Peak> {
        analysis::strongest_peaks(self.bins(), self.bin_frequencies(), count)
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock {
        &mut self.clock
    }

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn toggle(&mut self) {
        self.clock.toggle();
    }

    /// Move the playback cursor to `position`.
    pub fn seek(&mut self, position: Duration) {
        self.clock.seek(position);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.clock.set_looping(looping);
    }

    pub fn is_looping(&self) -> bool {
        self.clock.is_looping()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.clock.set_volume(volume);
    }

    pub fn volume(&self) -> f32 {
        self.clock.volume()
    }

    /// Seconds since the clip started.
    pub fn playing_offset(&self) -> f64 {
        self.clock.playing_offset()
    }

    pub fn sample_rate(&self) -> u32 {
        self.clip.sample_rate()
    }

    pub fn sample_count(&self) -> usize {
        self.clip.sample_count()
    }

    pub fn channel_count(&self) -> u16 {
        self.clip.channel_count()
    }

    pub fn duration(&self) -> Duration {
        self.clip.duration()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.clock.status()
    }
}
