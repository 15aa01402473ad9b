//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Feedback cooldowns per category
//! - The instant the "time together" counter starts from
//! - The anniversary date and how Feb 29 is handled
//! - Log level
//!
//! Configuration is stored at `~/.config/keepsake/config.toml`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::feedback::CooldownTable;
use crate::time::{AnnualDate, LeapDayPolicy};

/// Feedback configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default)]
    pub cooldowns: CooldownTable,
}

/// "Time together" configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TogetherConfig {
    /// Start of the relationship counter. Unset until the user picks one.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

/// Anniversary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnniversaryConfig {
    #[serde(default = "default_anniversary_month")]
    pub month: u32,
    #[serde(default = "default_anniversary_day")]
    pub day: u32,
    #[serde(default)]
    pub leap_day_policy: LeapDayPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/keepsake/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub together: TogetherConfig,
    #[serde(default)]
    pub anniversary: AnniversaryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_anniversary_month() -> u32 {
    2
}
fn default_anniversary_day() -> u32 {
    14
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for AnniversaryConfig {
    fn default() -> Self {
        Self {
            month: default_anniversary_month(),
            day: default_anniversary_day(),
            leap_day_policy: LeapDayPolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                // "none" clears any optional field, set or not. Required
                // fields reject the null when the config is rebuilt.
                let new_value = match existing {
                    _ if value.eq_ignore_ascii_case("none") => serde_json::Value::Null,
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
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

    /// Persist to the default location.
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

    /// Set a config value by dot-separated key. Nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.annual_date().map(|_| ())
    }

    pub fn cooldown_table(&self) -> CooldownTable {
        self.feedback.cooldowns.clone()
    }

    pub fn annual_date(&self) -> Result<AnnualDate, ConfigError> {
        AnnualDate::new(self.anniversary.month, self.anniversary.day).map_err(|e| match e {
            ValidationError::InvalidValue { message, .. } => ConfigError::InvalidValue {
                key: "anniversary".into(),
                message,
            },
            other => ConfigError::InvalidValue {
                key: "anniversary".into(),
                message: other.to_string(),
            },
        })
    }

    pub fn leap_day_policy(&self) -> LeapDayPolicy {
        self.anniversary.leap_day_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackCategory;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.feedback.cooldowns, CooldownTable::default());
        assert_eq!(parsed.anniversary.month, 2);
        assert!(parsed.together.started_at.is_none());
    }

    #[test]
    fn partial_toml_fills_missing_cooldowns_from_tap() {
        let cfg: Config = toml::from_str(
            r#"
            [feedback.cooldowns]
            tap = 50

            [anniversary]
            month = 7
            day = 11
            "#,
        )
        .unwrap();
        assert_eq!(cfg.feedback.cooldowns.get(FeedbackCategory::Tap), 50);
        assert_eq!(cfg.feedback.cooldowns.get(FeedbackCategory::Ambient), 50);
        assert_eq!(cfg.cooldown_table().get(FeedbackCategory::Navigate), 50);
        assert_eq!(cfg.annual_date().unwrap().to_string(), "07-11");
        assert_eq!(cfg.leap_day_policy(), LeapDayPolicy::Feb28);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn leap_day_policy_parses_lowercase() {
        let cfg: Config = toml::from_str(
            r#"
            [anniversary]
            month = 2
            day = 29
            leap_day_policy = "mar1"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.leap_day_policy(), LeapDayPolicy::Mar1);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("feedback.cooldowns.tap").as_deref(), Some("120"));
        assert_eq!(cfg.get("anniversary.leap_day_policy").as_deref(), Some("feb28"));
        assert_eq!(cfg.get("together.started_at").as_deref(), Some("null"));
        assert!(cfg.get("feedback.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.apply("feedback.cooldowns.success", "900").unwrap();
        assert_eq!(cfg.feedback.cooldowns.success, 900);
    }

    #[test]
    fn apply_sets_and_clears_optional_start() {
        let mut cfg = Config::default();
        cfg.apply("together.started_at", "2025-02-26T00:00:00Z").unwrap();
        assert_eq!(
            cfg.together.started_at.unwrap().to_rfc3339(),
            "2025-02-26T00:00:00+00:00"
        );
        cfg.apply("together.started_at", "none").unwrap();
        assert!(cfg.together.started_at.is_none());
    }

    #[test]
    fn apply_clears_start_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("together.started_at", "2025-02-26T00:00:00Z").unwrap();
        cfg.save_to(&path).unwrap();

        let mut cfg = Config::load_from(&path).unwrap();
        assert!(cfg.together.started_at.is_some());
        cfg.apply("together.started_at", "None").unwrap();
        cfg.save_to(&path).unwrap();
        assert!(Config::load_from(&path).unwrap().together.started_at.is_none());
    }

    #[test]
    fn apply_rejects_none_for_required_field() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("feedback.cooldowns.tap", "none"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.apply("logging.level", "none").is_err());
        assert_eq!(cfg.feedback.cooldowns.tap, 120);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("feedback.volume", "3"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_negative_cooldown() {
        let mut cfg = Config::default();
        assert!(cfg.apply("feedback.cooldowns.tap", "-5").is_err());
        assert_eq!(cfg.feedback.cooldowns.tap, 120);
    }

    #[test]
    fn apply_rejects_impossible_anniversary() {
        let mut cfg = Config::default();
        cfg.apply("anniversary.month", "4").unwrap();
        assert!(cfg.apply("anniversary.day", "31").is_err());
        assert_eq!(cfg.anniversary.day, 14);
    }

    #[test]
    fn apply_rejects_bad_policy() {
        let mut cfg = Config::default();
        assert!(cfg.apply("anniversary.leap_day_policy", "mar2").is_err());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.anniversary.day, 14);
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("anniversary.month", "7").unwrap();
        cfg.apply("anniversary.day", "11").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.annual_date().unwrap(), AnnualDate::new(7, 11).unwrap());
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[anniversary]\nmonth = 2\nday = 30\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
