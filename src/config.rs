//! Application configuration system with TOML persistence.
//!
//! Supports loading from file with fallback to sensible defaults.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Spectral analysis configuration
    pub analyzer: AnalyzerConfig,

    /// Bar level mapping configuration
    pub display: DisplayConfig,

    /// Playback cursor configuration
    pub playback: PlaybackConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

/// Spectral analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Samples per analysis frame (must be power of 2)
    pub frame_size: usize,
}

/// How bins map to bar heights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of bars, starting after the DC bin
    pub bar_count: usize,

    /// Magnitude multiplier (0.0-1.0)
    pub intensity: f32,

    /// Tallest bar in pixels
    pub max_bar_height: f32,

    /// Analysis ticks per second
    pub target_fps: u32,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Restart the clip when it ends
    pub looping: bool,

    /// Playback volume (0.0-100.0)
    pub volume: f32,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable metrics collection
    pub enabled: bool,

    /// Histogram precision (significant value digits)
    pub histogram_precision: u8,

    /// Maximum recorded tick latency in microseconds
    pub histogram_max_us: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { frame_size: 8192 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            bar_count: 4095,
            intensity: 0.20,
            max_bar_height: 600.0,
            target_fps: 60,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            looping: true,
            volume: 100.0,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            histogram_precision: 2,
            histogram_max_us: 1_000_000,
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: Box::new(path.to_path_buf()),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::InvalidFormat {
            path: Box::new(path.to_path_buf()),
            source,
        })
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let save_failed = |source| ConfigError::SaveFailed {
            path: Box::new(path.to_path_buf()),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(save_failed)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|source| ConfigError::SerializationFailed { source })?;

        std::fs::write(path, contents).map_err(save_failed)
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spectrum-visualizer")
            .join("config.toml")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let frame_size = self.analyzer.frame_size;
        if frame_size == 0 || !frame_size.is_power_of_two() {
            return Err(ConfigError::ValidationFailed {
                reason: format!("Frame size {} must be a power of 2", frame_size),
            });
        }

        if self.display.bar_count == 0 || self.display.bar_count >= frame_size {
            return Err(ConfigError::ValidationFailed {
                reason: format!(
                    "Bar count {} must be between 1 and {}",
                    self.display.bar_count,
                    frame_size - 1
                ),
            });
        }

        if !(0.0..=1.0).contains(&self.display.intensity) {
            return Err(ConfigError::ValidationFailed {
                reason: format!(
                    "Intensity {} out of range 0.0-1.0",
                    self.display.intensity
                ),
            });
        }

        if self.display.target_fps == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "Target FPS must be > 0".to_string(),
            });
        }

        if !(0.0..=100.0).contains(&self.playback.volume) {
            return Err(ConfigError::ValidationFailed {
                reason: format!("Volume {} out of range 0-100", self.playback.volume),
            });
        }

        Ok(())
    }
}

fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return std::env::var_os("APPDATA").map(PathBuf::from);
    }
    if cfg!(target_os = "macos") {
        return std::env::var_os("HOME").map(|h| PathBuf::from(h).join("Library/Application Support"));
    }
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = AppConfig::default();
        config.validate().expect("Default config should be valid");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).expect("Should serialize");
        let deserialized: AppConfig = toml::from_str(&toml_str).expect("Should deserialize");
        assert_eq!(deserialized.analyzer.frame_size, 8192);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("[analyzer]\nframe_size = 1024\n").unwrap();
        assert_eq!(config.analyzer.frame_size, 1024);
        assert_eq!(config.display.target_fps, 60);
        assert!(config.playback.looping);
    }

    #[test]
    fn test_validation_frame_size() {
        let mut config = AppConfig::default();
        config.analyzer.frame_size = 6000;
        assert!(config.validate().is_err());

        config.analyzer.frame_size = 0;
        assert!(config.validate().is_err());

        config.analyzer.frame_size = 16384;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_bar_count() {
        let mut config = AppConfig::default();
        config.display.bar_count = 8192;
        assert!(config.validate().is_err());

        config.display.bar_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_intensity_and_volume() {
        let mut config = AppConfig::default();
        config.display.intensity = 1.5;
        assert!(config.validate().is_err());

        config.display.intensity = 0.5;
        config.playback.volume = 101.0;
        assert!(config.validate().is_err());

        config.playback.volume = 50.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.display.intensity = 0.35;
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert!((loaded.display.intensity - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = AppConfig::load_or_default("/nonexistent/spectrum/config.toml");
        assert_eq!(config.analyzer.frame_size, 8192);
    }
}
