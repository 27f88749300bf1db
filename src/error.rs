//! Error types for the spectrum visualizer.
//!
//! Contract violations in the transform engine and invalid extractor
//! configuration are distinguishable by variant so callers can match on the
//! precondition that was broken.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all spectrum visualizer operations.
#[derive(Error, Debug)]
pub enum SpectrumError {
    /// Transform engine contract violations
    #[error("FFT error: {0}")]
    Fft(#[from] FftError),

    /// Invalid frame extractor configuration
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Audio file loading errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Rejected transform inputs. Raised before any element is mutated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    #[error("sequence is empty")]
    ZeroLength,

    #[error("sequence length {len} is not a power of two")]
    NotPowerOfTwo { len: usize },

    #[error("input length {input} does not match output length {output}")]
    LengthMismatch { input: usize, output: usize },
}

/// Invalid frame extractor configuration
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorError {
    #[error("frame size must be greater than zero")]
    ZeroFrameSize,

    #[error("frame size {frame_size} is not a power of two")]
    FrameSizeNotPowerOfTwo { frame_size: usize },

    #[error("sample rate must be greater than zero")]
    ZeroSampleRate,
}

/// Audio-related errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load WAV file '{path}': {source}")]
    LoadFailed { path: PathBuf, source: hound::Error },

    #[error("Invalid sample rate: {rate} Hz (must be 8kHz-192kHz)")]
    InvalidSampleRate { rate: u32 },

    #[error("Unsupported channel count: {channels} (only mono/stereo supported)")]
    UnsupportedChannels { channels: u16 },

    #[error("Unsupported sample format: {bits}-bit {format}")]
    UnsupportedFormat { bits: u16, format: &'static str },

    #[error("Empty audio file: {path}")]
    EmptyFile { path: PathBuf },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file '{path}': {source}")]
    LoadFailed {
        path: Box<PathBuf>,
        source: std::io::Error,
    },

    #[error("Invalid config format in '{path}': {source}")]
    InvalidFormat {
        path: Box<PathBuf>,
        source: toml::de::Error,
    },

    #[error("Config validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Failed to save config to '{path}': {source}")]
    SaveFailed {
        path: Box<PathBuf>,
        source: std::io::Error,
    },

    #[error("Config serialization failed: {source}")]
    SerializationFailed { source: toml::ser::Error },
}

/// Result type alias for spectrum visualizer operations
pub type Result<T, E = SpectrumError> = std::result::Result<T, E>;

impl AudioError {
    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AudioError::LoadFailed { path, .. } => {
                format!("Could not open audio file '{}'", path.display())
            }
            AudioError::InvalidSampleRate { rate } => {
                format!("Audio file has unsupported sample rate: {} Hz", rate)
            }
            AudioError::UnsupportedChannels { channels } => {
                format!("Audio file has unsupported {} channels", channels)
            }
            AudioError::UnsupportedFormat { bits, format } => {
                format!("Audio file uses unsupported {}-bit {} samples", bits, format)
            }
            AudioError::EmptyFile { path } => {
                format!("Audio file '{}' is empty", path.display())
            }
        }
    }
}
