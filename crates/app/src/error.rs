use insights_engine::EngineError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(#[from] insights_db::DbError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match &err {
            AppError::Engine(EngineError::Upstream(_)) => (502, Some("upstream_unavailable")),
            AppError::Engine(EngineError::Timeout { .. }) => (504, Some("upstream_timeout")),
            AppError::Engine(EngineError::Cancelled { .. }) => (503, Some("request_cancelled")),
            AppError::NotFound(_) => (404, Some("not_found")),
            AppError::Db(_) | AppError::Io(_) | AppError::Message(_) => (500, None),
        };
        Self {
            status,
            message: err.to_string(),
            code: code.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use insights_engine::{Stage, UpstreamError};

    use super::*;

    #[test]
    fn maps_engine_failures_to_gateway_statuses() {
        let upstream: ApiError =
            AppError::from(EngineError::from(UpstreamError::event_source("down"))).into();
        assert_eq!(upstream.status, 502);
        assert_eq!(upstream.code.as_deref(), Some("upstream_unavailable"));
        assert_eq!(upstream.message, "event source unavailable: down");

        let timeout: ApiError = AppError::from(EngineError::Timeout {
            stage: Stage::FetchEvents,
            timeout_ms: 250,
        })
        .into();
        assert_eq!(timeout.status, 504);
        assert_eq!(timeout.message, "event fetch timed out after 250ms");

        let cancelled: ApiError = AppError::from(EngineError::Cancelled {
            stage: Stage::ResolveNames,
        })
        .into();
        assert_eq!(cancelled.status, 503);
    }

    #[test]
    fn maps_local_failures() {
        let missing: ApiError = AppError::NotFound("no route for /nope".to_string()).into();
        assert_eq!(missing.status, 404);
        assert_eq!(missing.code.as_deref(), Some("not_found"));
        let other: ApiError = AppError::Message("boom".to_string()).into();
        assert_eq!(other.status, 500);
        assert!(other.code.is_none());
    }
}
