use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use insights_app::AppConfig;
use insights_engine::AlertThresholds;
use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "usage-insights";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 3845;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOG_FILTER: &str =
    "usage_insights=info,insights_engine=info,insights_app=info,http_api=info,tower_http=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub port: u16,
    pub fetch_timeout_ms: u64,
    pub demo_fallback: bool,
    pub log_filter: String,
    pub alerts: AlertsConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            demo_fallback: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            alerts: AlertsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    pub error_rate_percent: f64,
    pub avg_response_ms: f64,
    pub lookback_minutes: u32,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            error_rate_percent: 10.0,
            avg_response_ms: 5000.0,
            lookback_minutes: 60,
        }
    }
}

impl CliConfig {
    pub fn app_config(&self, db_path: PathBuf) -> AppConfig {
        let mut config = AppConfig::new(db_path);
        config.fetch_timeout = Duration::from_millis(self.fetch_timeout_ms.max(1));
        config.demo_fallback = self.demo_fallback;
        config.alert_thresholds = AlertThresholds {
            error_rate_percent: self.alerts.error_rate_percent,
            avg_response_ms: self.alerts.avg_response_ms,
            lookback: ChronoDuration::minutes(i64::from(self.alerts.lookback_minutes.max(1))),
        };
        config
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub file: PathBuf,
    pub created: bool,
}

/// Reads the config file, writing the defaults first if it does not exist.
pub fn load_or_create(override_path: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match override_path {
        Some(path) => path.to_path_buf(),
        None => default_config_dir()?.join(CONFIG_FILE_NAME),
    };

    if file.exists() {
        let contents = fs::read_to_string(&file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            file,
            created: false,
        });
    }

    if let Some(dir) = file.parent() {
        fs::create_dir_all(dir)
            .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    }
    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&file, contents)
        .map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        config,
        file,
        created: true,
    })
}

fn default_config_dir() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| "could not resolve the user config directory".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_then_reads_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let first = load_or_create(Some(&path)).expect("create");
        assert!(first.created);
        assert_eq!(first.config, CliConfig::default());

        let second = load_or_create(Some(&path)).expect("read");
        assert!(!second.created);
        assert_eq!(second.config.port, DEFAULT_PORT);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = 4000\n[alerts]\nlookback_minutes = 15\n").expect("write");

        let load = load_or_create(Some(&path)).expect("load");
        assert_eq!(load.config.port, 4000);
        assert!(load.config.demo_fallback);
        assert_eq!(load.config.alerts.lookback_minutes, 15);
        assert_eq!(load.config.alerts.error_rate_percent, 10.0);

        let app = load.config.app_config(dir.path().join("db.sqlite"));
        assert_eq!(app.fetch_timeout, Duration::from_secs(10));
        assert_eq!(app.alert_thresholds.lookback, ChronoDuration::minutes(15));
    }
}
