use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use insights_core::{AnalyticsReport, EventFilters, TimeRangeKey, UsageEvent};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::aggregate::aggregate;
use crate::alerts::{AlertThresholds, evaluate_alerts};
use crate::error::{EngineError, Result, Stage};
use crate::fallback::generate_fallback;
use crate::names::resolve_tool_names;
use crate::source::{EventSource, NameResolver};
use crate::window::plan_window;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsQuery {
    pub range: TimeRangeKey,
    pub filters: EventFilters,
}

/// Deadline and cancellation shared by every collaborator call of one request.
#[derive(Debug, Clone)]
pub struct FetchBudget {
    pub timeout: StdDuration,
    pub cancel: CancellationToken,
}

impl FetchBudget {
    pub fn new(timeout: StdDuration) -> Self {
        Self {
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub demo_fallback: bool,
    pub alert_thresholds: AlertThresholds,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            demo_fallback: true,
            alert_thresholds: AlertThresholds::default(),
        }
    }
}

/// Plans the window, fetches events, then aggregates them (or generates demo
/// data when the store has nothing for the window) and evaluates alerts.
#[derive(Clone)]
pub struct AnalyticsPipeline {
    source: Arc<dyn EventSource>,
    resolver: Arc<dyn NameResolver>,
    options: PipelineOptions,
}

impl AnalyticsPipeline {
    pub fn new(source: Arc<dyn EventSource>, resolver: Arc<dyn NameResolver>) -> Self {
        Self {
            source,
            resolver,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run(&self, query: &AnalyticsQuery, budget: &FetchBudget) -> Result<AnalyticsReport> {
        self.run_at(Utc::now(), query, budget).await
    }

    pub async fn run_at(
        &self,
        now: DateTime<Utc>,
        query: &AnalyticsQuery,
        budget: &FetchBudget,
    ) -> Result<AnalyticsReport> {
        let deadline = Instant::now() + budget.timeout;
        let plan = plan_window(query.range, now);

        let fetched = bounded(
            budget,
            deadline,
            Stage::FetchEvents,
            self.source.fetch(&plan.window, &query.filters),
        )
        .await??;
        let fetched_count = fetched.len();
        let events: Vec<UsageEvent> = fetched
            .into_iter()
            .filter(|event| event.created_at.is_some())
            .collect();
        if events.len() < fetched_count {
            tracing::debug!(
                skipped = fetched_count - events.len(),
                "ignoring events without a timestamp"
            );
        }

        if fetched_count == 0 && self.options.demo_fallback {
            tracing::warn!(
                range = query.range.as_str(),
                "no usage events in window, serving demo analytics"
            );
            let report = generate_fallback(&plan, &mut rand::thread_rng());
            return Ok(report);
        }

        let names = bounded(
            budget,
            deadline,
            Stage::ResolveNames,
            resolve_tool_names(self.resolver.as_ref(), &events),
        )
        .await?;
        let mut report = aggregate(&events, &plan, &names);
        report.alerts = evaluate_alerts(&events, now, &self.options.alert_thresholds);
        tracing::debug!(
            range = query.range.as_str(),
            events = events.len(),
            tools = report.tool_metrics.len(),
            models = report.model_metrics.len(),
            alerts = report.alerts.len(),
            "aggregated usage analytics"
        );
        Ok(report)
    }
}

async fn bounded<F: Future>(
    budget: &FetchBudget,
    deadline: Instant,
    stage: Stage,
    future: F,
) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = budget.cancel.cancelled() => Err(EngineError::Cancelled { stage }),
        outcome = tokio::time::timeout_at(deadline, future) => {
            outcome.map_err(|_| EngineError::Timeout {
                stage,
                timeout_ms: budget.timeout.as_millis() as u64,
            })
        }
    }
}
