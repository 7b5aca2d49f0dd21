//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Per-mode training presets (what the setup screen starts from)
//! - Audio cue preferences
//! - Session clock period
//!
//! Configuration is stored at `~/.config/roundbell/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::{TimerConfig, TimerMode};

/// One stored preset per training mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetsConfig {
    #[serde(default = "default_series")]
    pub series: TimerConfig,
    #[serde(default = "default_cluster")]
    pub cluster: TimerConfig,
    #[serde(default = "default_emom")]
    pub emom: TimerConfig,
    #[serde(default = "default_tabata")]
    pub tabata: TimerConfig,
    #[serde(default = "default_boxing")]
    pub boxing: TimerConfig,
}

/// Audio cue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell on phase changes.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Session clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/roundbell/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub presets: PresetsConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub clock: ClockConfig,
}

// Default functions
fn default_series() -> TimerConfig {
    TimerConfig::defaults_for(TimerMode::Series)
}
fn default_cluster() -> TimerConfig {
    TimerConfig::defaults_for(TimerMode::Cluster)
}
fn default_emom() -> TimerConfig {
    TimerConfig::defaults_for(TimerMode::Emom)
}
fn default_tabata() -> TimerConfig {
    TimerConfig::defaults_for(TimerMode::Tabata)
}
fn default_boxing() -> TimerConfig {
    TimerConfig::defaults_for(TimerMode::Boxing)
}
fn default_true() -> bool {
    true
}
fn default_tick_ms() -> u64 {
    1000
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            series: default_series(),
            cluster: default_cluster(),
            emom: default_emom(),
            tabata: default_tabata(),
            boxing: default_boxing(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presets: PresetsConfig::default(),
            audio: AudioConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

impl PresetsConfig {
    /// Stored preset for `mode`. The stored `mode` field is overridden so a
    /// hand-edited file cannot put a cluster preset under `boxing`.
    pub fn for_mode(&self, mode: TimerMode) -> TimerConfig {
        let mut preset = match mode {
            TimerMode::Series => self.series.clone(),
            TimerMode::Cluster => self.cluster.clone(),
            TimerMode::Emom => self.emom.clone(),
            TimerMode::Tabata => self.tabata.clone(),
            TimerMode::Boxing => self.boxing.clone(),
            TimerMode::Unknown => TimerConfig::defaults_for(TimerMode::Unknown),
        };
        preset.mode = mode;
        preset
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if no file exists.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(CoreError::Io(err)),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if the key is
    /// unknown or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn preset(&self, mode: TimerMode) -> TimerConfig {
        self.presets.for_mode(mode)
    }

    /// Clock period, never shorter than one millisecond.
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.clock.tick_ms.max(1))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[audio]\nbell = false\n").unwrap();
        assert!(parsed.audio.enabled);
        assert!(!parsed.audio.bell);
        assert_eq!(parsed.clock.tick_ms, 1000);
        assert_eq!(parsed.presets.tabata.sets, 8);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("audio.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("presets.boxing.round_time").as_deref(), Some("180"));
        assert_eq!(cfg.get("presets.emom.mode").as_deref(), Some("emom"));
        assert!(cfg.get("audio.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("presets.series.sets", "6").unwrap();
        assert_eq!(cfg.presets.series.sets, 6);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("audio.volume", "3").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("audio.bell", "loud").is_err());
        assert!(cfg.set("clock.tick_ms", "-5").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn preset_mode_is_forced() {
        let mut cfg = Config::default();
        cfg.presets.boxing.mode = TimerMode::Series;
        assert_eq!(cfg.preset(TimerMode::Boxing).mode, TimerMode::Boxing);
    }

    #[test]
    fn tick_period_never_zero() {
        let mut cfg = Config::default();
        cfg.clock.tick_ms = 0;
        assert_eq!(cfg.tick_period(), std::time::Duration::from_millis(1));
    }
}
