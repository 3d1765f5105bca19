use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::playback::SequencerConfig;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no configuration directory on this platform")]
    NoConfigDir,

    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub slideshow_period_secs: f64,
    pub tick_period_secs: f64,
    /// Inventory file; the demo inventory is used when unset
    pub inventory_path: Option<PathBuf>,
    /// Root URL that share links are built on
    pub share_base_url: String,
    pub start_in_slideshow: bool,
    pub immersive_360: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            slideshow_period_secs: 8.0,
            tick_period_secs: 1.0,
            inventory_path: None,
            share_base_url: "https://showroom.example.com/customer".to_string(),
            start_in_slideshow: false,
            immersive_360: false,
        }
    }
}

impl AppSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("showroom").join("settings.json"))
    }

    /// Load from the platform config dir, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        let parsed = fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|contents| serde_json::from_str(&contents).map_err(SettingsError::from));

        match parsed {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Sequencer timing from these settings; non-finite or negative periods
    /// fall back to the defaults
    pub fn sequencer_config(&self) -> SequencerConfig {
        let defaults = SequencerConfig::default();
        SequencerConfig::default()
            .with_slideshow_period(seconds(self.slideshow_period_secs).unwrap_or(defaults.slideshow_period))
            .with_tick_period(seconds(self.tick_period_secs).unwrap_or(defaults.tick_period))
    }
}

fn seconds(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = AppSettings {
            slideshow_period_secs: 5.0,
            inventory_path: Some(PathBuf::from("/srv/lot.csv")),
            start_in_slideshow: true,
            ..AppSettings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_or_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"immersive_360": true}"#).unwrap();

        let settings = AppSettings::load_from(&path);
        assert!(settings.immersive_360);
        assert_eq!(settings.slideshow_period_secs, 8.0);
    }

    #[test]
    fn test_sequencer_config_periods() {
        let settings = AppSettings {
            slideshow_period_secs: 2.5,
            tick_period_secs: -1.0,
            ..AppSettings::default()
        };
        let config = settings.sequencer_config();
        assert_eq!(config.slideshow_period, Duration::from_millis(2_500));
        assert_eq!(config.tick_period, Duration::from_secs(1));
        assert!(config.allow_vehicle_advance);

        let huge = AppSettings {
            slideshow_period_secs: 1e19,
            ..AppSettings::default()
        };
        assert_eq!(huge.sequencer_config().slideshow_period, crate::playback::MAX_PERIOD);
    }
}
