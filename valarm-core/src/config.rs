//! User configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{AlarmError, AlarmResult};
use crate::event::EventInfo;

static DEFAULT_SUMMARY: &str = "Reminder";

fn default_summary() -> String {
    DEFAULT_SUMMARY.to_string()
}

/// Settings at ~/.config/valarm/config.toml, overridable with `VALARM_*`
/// environment variables.
///
/// Only consulted when alarms are built from the command line without an
/// explicit event.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ValarmConfig {
    /// IANA timezone absolute triggers are rendered in.
    pub timezone: Option<String>,

    /// Fallback event summary.
    #[serde(default = "default_summary")]
    pub summary: String,
}

impl Default for ValarmConfig {
    fn default() -> Self {
        ValarmConfig {
            timezone: None,
            summary: default_summary(),
        }
    }
}

impl ValarmConfig {
    pub fn config_path() -> AlarmResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AlarmError::Config("Could not determine config directory".into()))?
            .join("valarm");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> AlarmResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, with `VALARM_*` environment variables on top.
    pub fn load_from(path: &Path) -> AlarmResult<Self> {
        Self::load_with_env(path, Some(Environment::with_prefix("VALARM")))
    }

    fn load_with_env(path: &Path, env: Option<Environment>) -> AlarmResult<Self> {
        let mut builder = Config::builder().add_source(File::from(path).required(false));
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let config: ValarmConfig = builder
            .build()
            .map_err(|e| AlarmError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AlarmError::Config(e.to_string()))?;

        log::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Event context built from these defaults.
    pub fn event_info(&self) -> AlarmResult<EventInfo> {
        let info = EventInfo::new(self.summary.clone());
        match self.timezone.as_deref() {
            Some(tz) => info.with_timezone(tz),
            None => Ok(info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventContext;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ValarmConfig::load_with_env(&dir.path().join("config.toml"), None).unwrap();
        assert_eq!(config, ValarmConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timezone = \"Asia/Tokyo\"\nsummary = \"Heads up\"\n").unwrap();

        let config = ValarmConfig::load_with_env(&path, None).unwrap();
        assert_eq!(config.timezone.as_deref(), Some("Asia/Tokyo"));

        let event = config.event_info().unwrap();
        assert_eq!(event.summary(), "Heads up");
        assert_eq!(event.timezone(), Some(chrono_tz::Asia::Tokyo));
    }

    #[test]
    fn test_bad_timezone_in_config() {
        let config = ValarmConfig {
            timezone: Some("Not/AZone".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.event_info().unwrap_err(),
            AlarmError::Construction(_)
        ));
    }
}
