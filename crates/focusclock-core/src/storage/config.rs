//! TOML-based application configuration.
//!
//! Stores:
//! - Session durations (work, short break, long break)
//! - Long-break rotation interval
//! - Default daily focus goal
//! - Driver timing (tick interval, delay before advancing)
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::productivity::{ProductivityTracker, DEFAULT_DAILY_GOAL_MINUTES};
use crate::timer::{SessionClock, SessionDurations};

/// Session lengths in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationsConfig {
    #[serde(default = "default_work")]
    pub work: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Every n-th work session is followed by a long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsConfig {
    /// Goal used when the stats store is empty.
    #[serde(default = "default_daily_goal_minutes")]
    pub daily_goal_minutes: u32,
}

/// Settings for the periodic driver that feeds `tick()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Pause between a completion and the switch to the next session.
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default = "default_true")]
    pub auto_advance: bool,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub durations: DurationsConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub goals: GoalsConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

fn default_work() -> u32 {
    SessionDurations::DEFAULT_WORK_MIN
}
fn default_short_break() -> u32 {
    SessionDurations::DEFAULT_SHORT_BREAK_MIN
}
fn default_long_break() -> u32 {
    SessionDurations::DEFAULT_LONG_BREAK_MIN
}
fn default_long_break_interval() -> u32 {
    SessionClock::DEFAULT_LONG_BREAK_INTERVAL
}
fn default_daily_goal_minutes() -> u32 {
    DEFAULT_DAILY_GOAL_MINUTES
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_advance_delay_ms() -> u64 {
    1500
}
fn default_true() -> bool {
    true
}

impl Default for DurationsConfig {
    fn default() -> Self {
        Self {
            work: default_work(),
            short_break: default_short_break(),
            long_break: default_long_break(),
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            daily_goal_minutes: default_daily_goal_minutes(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            advance_delay_ms: default_advance_delay_ms(),
            auto_advance: true,
        }
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let new_value = match obj.get(leaf).ok_or_else(unknown)? {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as a non-negative integer")))?,
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot set a whole section".to_string()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
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

    /// Set a config value by dot-separated key.
    ///
    /// The change is validated before it is applied; on error `self` is
    /// left as it was. Call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check every value the clock, tracker and driver depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session_clock()?;
        self.new_tracker()?;
        if self.driver.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "driver.tick_interval_ms".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }

    pub fn session_durations(&self) -> Result<SessionDurations, ConfigError> {
        SessionDurations::new(
            self.durations.work,
            self.durations.short_break,
            self.durations.long_break,
        )
        .map_err(invalid_input)
    }

    /// A fresh idle clock built from the configured durations and rotation.
    pub fn session_clock(&self) -> Result<SessionClock, ConfigError> {
        SessionClock::with_long_break_interval(
            self.session_durations()?,
            self.rotation.long_break_interval,
        )
        .map_err(invalid_input)
    }

    /// An empty tracker using the configured daily goal.
    pub fn new_tracker(&self) -> Result<ProductivityTracker, ConfigError> {
        ProductivityTracker::with_daily_goal(i64::from(self.goals.daily_goal_minutes))
            .map_err(|e| ConfigError::InvalidValue {
                key: "goals.daily_goal_minutes".to_string(),
                message: e.reason.to_string(),
            })
    }
}

fn invalid_input(e: crate::error::InvalidInput) -> ConfigError {
    ConfigError::InvalidValue {
        key: e.field.to_string(),
        message: e.reason.to_string(),
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
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.durations.work, 25);
        assert_eq!(cfg.durations.short_break, 5);
        assert_eq!(cfg.durations.long_break, 15);
        assert_eq!(cfg.rotation.long_break_interval, 3);
        assert_eq!(cfg.goals.daily_goal_minutes, 480);
        assert_eq!(cfg.driver.tick_interval_ms, 1000);
        assert!(cfg.driver.auto_advance);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[durations]\nwork = 50\n").unwrap();
        assert_eq!(cfg.durations.work, 50);
        assert_eq!(cfg.durations.short_break, 5);
        assert_eq!(cfg.goals.daily_goal_minutes, 480);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("durations.work").as_deref(), Some("25"));
        assert_eq!(cfg.get("driver.auto_advance").as_deref(), Some("true"));
        assert!(cfg.get("durations.missing").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("durations.work", "50").unwrap();
        cfg.set("driver.auto_advance", "false").unwrap();
        assert_eq!(cfg.durations.work, 50);
        assert!(!cfg.driver.auto_advance);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("durations.nap", "5"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("", "5").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("driver.auto_advance", "sometimes").is_err());
        assert!(cfg.set("durations.work", "-5").is_err());
    }

    #[test]
    fn set_rejects_zero_duration_and_keeps_old_value() {
        let mut cfg = Config::default();
        let err = cfg.set("durations.short_break", "0").unwrap_err();
        assert!(err.to_string().contains("durations.short_break"));
        assert_eq!(cfg.durations.short_break, 5);

        assert!(cfg.set("rotation.long_break_interval", "0").is_err());
        assert!(cfg.set("goals.daily_goal_minutes", "0").is_err());
        assert!(cfg.set("driver.tick_interval_ms", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("durations.long_break", "20").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().durations.long_break, 20);
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[durations]\nwork = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "not toml [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn builds_clock_and_tracker() {
        let mut cfg = Config::default();
        cfg.set("rotation.long_break_interval", "4").unwrap();
        cfg.set("goals.daily_goal_minutes", "240").unwrap();
        let clock = cfg.session_clock().unwrap();
        assert_eq!(clock.long_break_interval(), 4);
        assert_eq!(cfg.new_tracker().unwrap().daily_goal_minutes(), 240);
    }
}
