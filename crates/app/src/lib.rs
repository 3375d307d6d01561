pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod startup;

pub use app::{AppConfig, AppState};
pub use config::AnalyticsParams;
pub use error::{ApiError, AppError, Result};
pub use services::{AnalyticsService, AppServices, SqliteStore};
pub use startup::{AppPaths, ensure_app_data_dir};
