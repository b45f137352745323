use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

/// Open-Meteo endpoints and request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    /// Geocoding API base URL; `/search` is appended.
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Forecast API base URL; `/forecast` is appended.
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Language for geocoding results.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    5
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_secs: default_timeout(),
            language: default_language(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// city = "London"
///
/// [open_meteo]
/// timeout_secs = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// City used when none is given on the command line.
    pub city: Option<String>,

    #[serde(default)]
    pub open_meteo: OpenMeteoConfig,
}

impl Config {
    /// Pick the explicit city if given, otherwise the configured one.
    pub fn resolve_city(&self, explicit: Option<String>) -> Result<String> {
        explicit
            .or_else(|| self.city.clone())
            .filter(|city| !city.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No city given and no default city configured.\n\
                     Hint: pass a city, set CITY, or run `startpage configure`."
                )
            })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "startpage", "startpage")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
