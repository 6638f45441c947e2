/// Studio configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use studio_gateway::{GatewayConfig, DEFAULT_BUCKET};
use studio_playback::DEFAULT_VOLUME;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "studio.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub gateway: GatewaySettings,

    #[serde(default)]
    pub player: PlayerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewaySettings {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,
}

impl StudioConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `studio.toml` is used when
    /// present. `STUDIO_` variables override both, with `__` between
    /// section and key (`STUDIO_GATEWAY__ANON_KEY`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    pub(crate) fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file {:?} not found",
                        path
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(env);

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.gateway.url.trim().is_empty() {
            return Err(CliError::Config(
                "Gateway URL is required (set STUDIO_GATEWAY__URL)".to_string(),
            ));
        }

        if self.gateway.anon_key.trim().is_empty() {
            return Err(CliError::Config(
                "Gateway API key is required (set STUDIO_GATEWAY__ANON_KEY)".to_string(),
            ));
        }

        if self.gateway.bucket.trim().is_empty() {
            return Err(CliError::Config("Storage bucket cannot be empty".to_string()));
        }

        let volume = self.player.initial_volume;
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Config(format!(
                "player.initial_volume must be between 0.0 and 1.0, got {}",
                volume
            )));
        }

        Ok(())
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.gateway.url.clone(), self.gateway.anon_key.clone())
            .with_bucket(self.gateway.bucket.clone())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("STUDIO")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_initial_volume() -> f32 {
    DEFAULT_VOLUME
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            bucket: default_bucket(),
        }
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            initial_volume: default_initial_volume(),
        }
    }
}
