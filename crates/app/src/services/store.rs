use async_trait::async_trait;
use insights_core::{EventFilters, TimeRange, UsageEvent};
use insights_engine::{EventSource, NameResolver, UpstreamError};

use crate::error::Result;
use crate::services::{SharedConfig, open_db};

/// SQLite-backed event source and tool directory.
///
/// Each call opens its own connection on the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    config: SharedConfig,
}

impl SqliteStore {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    async fn blocking<T, F>(&self, work: F) -> std::result::Result<Result<T>, String>
    where
        T: Send + 'static,
        F: FnOnce(&SharedConfig) -> Result<T> + Send + 'static,
    {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || work(&config))
            .await
            .map_err(|err| format!("storage task failed: {err}"))
    }
}

#[async_trait]
impl EventSource for SqliteStore {
    async fn fetch(
        &self,
        range: &TimeRange,
        filters: &EventFilters,
    ) -> std::result::Result<Vec<UsageEvent>, UpstreamError> {
        let range = *range;
        let filters = filters.clone();
        let events = self
            .blocking(move |config| {
                let db = open_db(config)?;
                Ok(db.list_usage_events(&range, &filters)?)
            })
            .await
            .map_err(UpstreamError::event_source)?
            .map_err(UpstreamError::event_source)?;
        tracing::debug!(count = events.len(), "loaded usage events");
        Ok(events)
    }
}

#[async_trait]
impl NameResolver for SqliteStore {
    async fn resolve(&self, tool_id: &str) -> std::result::Result<Option<String>, UpstreamError> {
        let tool_id = tool_id.to_string();
        self.blocking(move |config| {
            let db = open_db(config)?;
            Ok(db.tool_name(&tool_id)?)
        })
        .await
        .map_err(UpstreamError::name_resolver)?
        .map_err(UpstreamError::name_resolver)
    }
}
