use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitorTarget {
    pub id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub chat_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// Filled from `TELEGRAM_BOT_TOKEN`, never from the config file.
    #[serde(skip)]
    pub telegram_bot_token: String,
    pub targets: Vec<MonitorTarget>,
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    #[serde(default = "default_check_timeout")]
    pub check_timeout_seconds: f64,
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
    #[serde(default = "default_timezone")]
    pub timezone_name: String,
}

fn default_check_interval() -> u64 { 300 }
fn default_check_timeout() -> f64 { 3.0 }
fn default_state_path() -> PathBuf { PathBuf::from("state.json") }
fn default_timezone() -> String { "Europe/Kyiv".to_string() }

impl RuntimeConfig {
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.check_timeout_seconds)
    }

    /// Operator timezone for notification time labels. Validated at startup;
    /// falls back to UTC rather than panicking if the name goes stale.
    pub fn timezone(&self) -> Tz {
        self.timezone_name.parse().unwrap_or(chrono_tz::UTC)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.telegram_bot_token.len() >= 10,
            "TELEGRAM_BOT_TOKEN is missing or too short"
        );
        ensure!(!self.targets.is_empty(), "At least one monitor target is required");
        for target in &self.targets {
            ensure!(!target.id.is_empty(), "Target id must not be empty");
            ensure!(!target.name.is_empty(), "Target {} has an empty name", target.id);
            ensure!(!target.host.is_empty(), "Target {} has an empty host", target.id);
            ensure!(target.port != 0, "Target {} has an invalid port", target.id);
            ensure!(!target.chat_id.is_empty(), "Target {} has an empty chat_id", target.id);
        }
        ensure!(
            self.check_interval_seconds >= 60,
            "check_interval_seconds must be at least 60"
        );
        ensure!(
            self.check_timeout_seconds.is_finite() && self.check_timeout_seconds > 0.0,
            "check_timeout_seconds must be positive"
        );
        ensure!(
            !self.state_path.as_os_str().is_empty(),
            "state_path must not be empty"
        );
        ensure!(
            self.timezone_name.parse::<Tz>().is_ok(),
            "Unknown timezone {}",
            self.timezone_name
        );
        Ok(())
    }
}

pub fn load_runtime_config(path: &Path) -> Result<RuntimeConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut config: RuntimeConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config.telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RuntimeConfig {
        RuntimeConfig {
            telegram_bot_token: "123456789:AAExampleToken".to_string(),
            targets: vec![MonitorTarget {
                id: "home".to_string(),
                name: "Квартира".to_string(),
                host: "203.0.113.10".to_string(),
                port: 443,
                chat_id: "-100123456789".to_string(),
            }],
            check_interval_seconds: 300,
            check_timeout_seconds: 3.0,
            state_path: PathBuf::from("state.json"),
            timezone_name: "Europe/Kyiv".to_string(),
        }
    }

    #[test]
    fn parsing_applies_defaults() {
        let raw = r#"{
            "targets": [
                {"id": "home", "name": "Квартира", "host": "203.0.113.10", "port": 443, "chat_id": "-1"}
            ]
        }"#;
        let config: RuntimeConfig = serde_json::from_str(raw).unwrap();

        assert_eq!(config.check_interval_seconds, 300);
        assert_eq!(config.check_timeout_seconds, 3.0);
        assert_eq!(config.state_path, PathBuf::from("state.json"));
        assert_eq!(config.timezone_name, "Europe/Kyiv");
        assert!(config.telegram_bot_token.is_empty());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn short_bot_token_is_rejected() {
        let mut config = valid_config();
        config.telegram_bot_token = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_target_list_is_rejected() {
        let mut config = valid_config();
        config.targets.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = valid_config();
        config.targets[0].port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = valid_config();
        config.targets[0].host.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn sub_minute_interval_is_rejected() {
        let mut config = valid_config();
        config.check_interval_seconds = 59;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_timeout_is_rejected() {
        let mut config = valid_config();
        config.check_timeout_seconds = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let mut config = valid_config();
        config.timezone_name = "Mars/Olympus_Mons".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn stale_timezone_falls_back_to_utc() {
        let mut config = valid_config();
        config.timezone_name = "Mars/Olympus_Mons".to_string();
        assert_eq!(config.timezone(), chrono_tz::UTC);
    }
}
