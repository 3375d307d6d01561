use std::sync::Arc;

use chrono::{DateTime, Utc};
use insights_core::AnalyticsReport;
use insights_engine::{AnalyticsPipeline, FetchBudget, PipelineOptions};
use tokio_util::sync::CancellationToken;

use crate::config::AnalyticsParams;
use crate::error::Result;
use crate::services::SharedConfig;
use crate::services::store::SqliteStore;

#[derive(Clone)]
pub struct AnalyticsService {
    config: SharedConfig,
    pipeline: AnalyticsPipeline,
}

impl AnalyticsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        let store = Arc::new(SqliteStore::new(config.clone()));
        let pipeline = AnalyticsPipeline::new(store.clone(), store).with_options(PipelineOptions {
            demo_fallback: config.demo_fallback,
            alert_thresholds: config.alert_thresholds,
        });
        Self { config, pipeline }
    }

    pub async fn report(
        &self,
        params: &AnalyticsParams,
        cancel: CancellationToken,
    ) -> Result<AnalyticsReport> {
        self.report_at(Utc::now(), params, cancel).await
    }

    pub async fn report_at(
        &self,
        now: DateTime<Utc>,
        params: &AnalyticsParams,
        cancel: CancellationToken,
    ) -> Result<AnalyticsReport> {
        let query = params.to_query();
        let budget = FetchBudget::new(self.config.fetch_timeout).with_cancel(cancel);
        let report = self.pipeline.run_at(now, &query, &budget).await?;
        tracing::info!(
            range = query.range.as_str(),
            tools = query.filters.tool_ids.len(),
            models = query.filters.models.len(),
            requests = report.overview.total_requests,
            alerts = report.alerts.len(),
            "served analytics report"
        );
        Ok(report)
    }
}
