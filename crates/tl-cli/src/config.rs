//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tl_store::{CalendarCodec, Format};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the task file.
    pub store_path: PathBuf,
    /// Format of the task file.
    pub store_format: Format,
    /// Header `SUMMARY` of written calendars.
    pub calendar_version: String,
    /// `CALSCALE` of written calendars.
    pub calendar_scale: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let codec = CalendarCodec::default();
        Self {
            store_path: data_dir.join("tasks.csv"),
            store_format: Format::Csv,
            calendar_version: codec.version,
            calendar_scale: codec.scale,
        }
    }
}

impl Config {
    /// Loads configuration from default locations, then `config_path`, then
    /// the environment.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // TL_STORE_PATH, TL_STORE_FORMAT, ...
        figment = figment.merge(Env::prefixed("TL_"));

        figment.extract()
    }

    pub fn calendar(&self) -> CalendarCodec {
        CalendarCodec::new(&self.calendar_version, &self.calendar_scale)
    }
}

/// Returns the platform-specific config directory for tl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tl"))
}

/// Returns the platform-specific data directory for tl.
///
/// On Linux: `~/.local/share/tl`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("tl"))
}
