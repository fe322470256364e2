/// Daemon configuration
use crate::error::{DaemonError, Result};
use lull_core::{Sound, SoundTag, StaticCatalog};
use lull_playback::MIN_TIME_PERIOD_SECS;
use lull_service::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "lulld.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Sound catalog offered to commands and random mixes
    #[serde(default = "default_sounds")]
    pub sounds: Vec<Sound>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding presets and settings
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl DaemonConfig {
    /// Load configuration from a TOML file and `LULL_` environment variables
    ///
    /// An explicit `path` must exist. Without one, `lulld.toml` in the
    /// working directory is used when present. Nested keys use a double
    /// underscore, e.g. `LULL_SERVICE__TICK_INTERVAL_MS=50`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    builder = builder.add_source(config::File::from(default));
                }
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("LULL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| DaemonError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| DaemonError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sounds.is_empty() {
            return Err(DaemonError::Config(
                "Sound catalog must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for sound in &self.sounds {
            if sound.key.trim().is_empty() {
                return Err(DaemonError::Config("Sound key must not be empty".to_string()));
            }
            if !seen.insert(sound.key.as_str()) {
                return Err(DaemonError::Config(format!(
                    "Duplicate sound key: {}",
                    sound.key
                )));
            }
        }

        let playback = &self.service.playback;
        if !(0.0..=1.0).contains(&playback.default_volume) {
            return Err(DaemonError::Config(
                "Default volume must be between 0.0 and 1.0".to_string(),
            ));
        }
        if playback.random_volume_min > playback.random_volume_max {
            return Err(DaemonError::Config(
                "Random volume minimum exceeds maximum".to_string(),
            ));
        }
        if playback.min_time_period_secs < MIN_TIME_PERIOD_SECS {
            return Err(DaemonError::Config(format!(
                "Minimum time period must be at least {} second(s)",
                MIN_TIME_PERIOD_SECS
            )));
        }
        if playback.min_time_period_secs > playback.max_time_period_secs {
            return Err(DaemonError::Config(
                "Minimum time period exceeds maximum".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the in-memory catalog from the configured sounds
    pub fn catalog(&self) -> StaticCatalog {
        StaticCatalog::new(self.sounds.iter().cloned())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            storage: StorageConfig::default(),
            sounds: default_sounds(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

// Default value functions
fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/lull.json")
}

fn default_sounds() -> Vec<Sound> {
    use SoundTag::{Focus, Relax};

    vec![
        Sound::looping("birds", &[Relax]),
        Sound::looping("cafe", &[Focus]),
        Sound::looping("fire", &[Relax, Focus]),
        Sound::looping("rain", &[Relax, Focus]),
        Sound::one_shot("thunder", &[Relax]),
        Sound::looping("train", &[Focus]),
        Sound::looping("waves", &[Relax]),
        Sound::one_shot("wind_chimes", &[Relax]),
        Sound::looping("wind", &[Relax, Focus]),
    ]
}
