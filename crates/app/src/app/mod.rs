use std::path::PathBuf;
use std::time::Duration;

use insights_db::Db;
use insights_engine::AlertThresholds;

use crate::error::{AppError, Result};
use crate::services::AppServices;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Storage location and request tuning for the analytics service.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub fetch_timeout: Duration,
    pub demo_fallback: bool,
    pub alert_thresholds: AlertThresholds,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            demo_fallback: true,
            alert_thresholds: AlertThresholds::default(),
        }
    }
}

/// Application state shared by frontends (HTTP server, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn is_fresh_db(&self) -> bool {
        !self.config.db_path.exists()
    }

    pub fn setup_db(&self) -> Result<()> {
        let fresh = self.is_fresh_db();
        let mut db = Db::open(&self.config.db_path)
            .map_err(|err| AppError::Message(format!("open db: {}", err)))?;
        db.migrate()?;
        tracing::info!(
            path = %self.config.db_path.display(),
            fresh,
            "usage database ready"
        );
        Ok(())
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}
