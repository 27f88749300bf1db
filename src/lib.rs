//! Frame-by-frame frequency analysis of a playing audio clip.
//!
//! [`SpectrumPlayer`] ties a decoded [`audio::AudioClip`] to a playback clock
//! and a [`SpectralExtractor`], which windows the frame under the cursor and
//! runs it through the radix-2 transform in [`fft`].

pub mod analysis;
pub mod audio;
pub mod audio_state;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fft;
pub mod metrics;
pub mod player;
pub mod utils;

// Test fixtures for synthetic audio generation
pub mod test_fixtures;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AudioError, ExtractorError, FftError, Result, SpectrumError};
pub use extractor::{SampleSource, SpectralExtractor, TickOutcome};
pub use player::SpectrumPlayer;
