//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{FacecursorError, FacecursorResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Default tracking parameters.
    pub tracking: TrackingDefaults,

    /// Display region the cursor is confined to.
    pub display: DisplayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default tracking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingDefaults {
    /// Cursor displacement per unit of relative mouth deviation.
    pub speed: f64,

    /// Dead-zone multiplier applied to the calibrated threshold ratios.
    pub sensitivity: f64,

    /// Minimum time between two clicks of the same gesture (seconds).
    pub refractory_secs: f64,

    /// Number of mouth samples collected before calibration completes.
    pub calibration_window: usize,

    /// Whether gestures produce clicks.
    pub click_enabled: bool,

    /// Gesture that drives clicks ("smile" or "blink").
    pub gesture: String,
}

/// Display region in points. The origin is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f64,
    pub height: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "facecursor_session=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for TrackingDefaults {
    fn default() -> Self {
        Self {
            speed: 40.0,
            sensitivity: 3.0,
            refractory_secs: 0.3,
            calibration_window: 101,
            click_enabled: true,
            gesture: "smile".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                    Ok(config) => match config.validate() {
                        Ok(()) => return config,
                        Err(e) => {
                            tracing::warn!("Ignoring invalid config at {:?}: {}", config_path, e);
                        }
                    },
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Check that numeric parameters are usable by the tracking pipeline.
    pub fn validate(&self) -> FacecursorResult<()> {
        let t = &self.tracking;
        if !t.speed.is_finite() || t.speed < 0.0 {
            return Err(FacecursorError::config(format!(
                "speed must be finite and non-negative, got {}",
                t.speed
            )));
        }
        if !t.sensitivity.is_finite() {
            return Err(FacecursorError::config("sensitivity must be finite"));
        }
        if !t.refractory_secs.is_finite() || t.refractory_secs < 0.0 {
            return Err(FacecursorError::config(format!(
                "refractory_secs must be finite and non-negative, got {}",
                t.refractory_secs
            )));
        }
        if t.calibration_window < 2 {
            return Err(FacecursorError::config(
                "calibration_window must hold at least 2 samples",
            ));
        }
        let d = &self.display;
        if !(d.width > 0.0 && d.height > 0.0) || !d.width.is_finite() || !d.height.is_finite() {
            return Err(FacecursorError::config(format!(
                "display must have positive extents, got {}x{}",
                d.width, d.height
            )));
        }
        Ok(())
    }

    /// Path the config is loaded from.
    pub fn path() -> PathBuf {
        config_file_path()
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("facecursor").join("config.json")
}
