use std::collections::HashSet;

use insights_core::{
    AnalyticsOverview, AnalyticsReport, ErrorBreakdown, ModelMetrics, TimeSeriesPoint,
    ToolMetrics, TopUser, UsageEvent, UserMetrics,
};

use crate::group::{group_by, percentage, rounded_average};
use crate::names::ToolNames;
use crate::window::BucketPlan;

const POPULAR_TOOLS: usize = 5;
const TOP_USERS: usize = 10;
const ESTIMATED_USERS_FLOOR: u64 = 100;
const MASKED_ID_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    requests: u64,
    successes: u64,
    response_ms: u64,
    tokens: u64,
    cost: f64,
}

impl Totals {
    fn from_events<'a>(events: impl IntoIterator<Item = &'a UsageEvent>) -> Self {
        let mut totals = Self::default();
        for event in events {
            totals.add(event);
        }
        totals
    }

    fn add(&mut self, event: &UsageEvent) {
        self.requests += 1;
        if event.is_success() {
            self.successes += 1;
        }
        self.response_ms = self.response_ms.saturating_add(event.response_time());
        self.tokens = self.tokens.saturating_add(event.tokens());
        self.cost += event.cost_value();
    }

    fn success_rate(&self, empty: u32) -> u32 {
        percentage(self.successes, self.requests, empty)
    }

    fn avg_response_time(&self) -> u64 {
        rounded_average(self.response_ms, self.requests)
    }
}

/// Derives overview, time series and per-tool/model/user rollups.
///
/// Events without `created_at` are ignored. Overview and rollups cover every
/// remaining event; the series only counts events inside the plan window.
/// `alerts` is left empty, see [`crate::evaluate_alerts`].
pub fn aggregate(events: &[UsageEvent], plan: &BucketPlan, names: &ToolNames) -> AnalyticsReport {
    let events: Vec<&UsageEvent> = events
        .iter()
        .filter(|event| event.created_at.is_some())
        .collect();
    let tool_metrics = tool_metrics(&events, names);
    let overview = overview(&events, &tool_metrics);
    AnalyticsReport {
        time_series_data: time_series(&events, plan),
        model_metrics: model_metrics(&events),
        user_metrics: user_metrics(&events, overview.active_users),
        overview,
        tool_metrics,
        alerts: Vec::new(),
    }
}

fn overview(events: &[&UsageEvent], tools: &[ToolMetrics]) -> AnalyticsOverview {
    let totals = Totals::from_events(events.iter().copied());
    AnalyticsOverview {
        total_requests: totals.requests,
        successful_requests: totals.successes,
        failed_requests: totals.requests - totals.successes,
        avg_response_time: totals.avg_response_time(),
        total_tokens_used: totals.tokens,
        total_cost: totals.cost,
        active_users: distinct_users(events),
        popular_tools: tools
            .iter()
            .take(POPULAR_TOOLS)
            .map(|tool| tool.tool_id.clone())
            .collect(),
    }
}

fn distinct_users(events: &[&UsageEvent]) -> u64 {
    events
        .iter()
        .filter_map(|event| event.user_id.as_deref())
        .collect::<HashSet<_>>()
        .len() as u64
}

fn time_series(events: &[&UsageEvent], plan: &BucketPlan) -> Vec<TimeSeriesPoint> {
    let mut buckets = vec![Totals::default(); plan.buckets.len()];
    for event in events {
        if let Some(index) = event.created_at.and_then(|ts| plan.bucket_index(ts)) {
            buckets[index].add(event);
        }
    }
    plan.buckets
        .iter()
        .zip(buckets)
        .map(|(bucket, totals)| TimeSeriesPoint {
            timestamp: bucket.start,
            requests: totals.requests,
            // An empty bucket reads as healthy.
            success_rate: totals.success_rate(100),
            response_time: totals.avg_response_time(),
            tokens_used: totals.tokens,
            cost: totals.cost,
        })
        .collect()
}

fn error_breakdown(events: &[&UsageEvent]) -> Vec<ErrorBreakdown> {
    let failures = events.iter().copied().filter(|event| !event.is_success());
    let mut rows: Vec<ErrorBreakdown> = group_by(failures, |event| event.error_label().to_string())
        .into_iter()
        .filter_map(|(error_type, items)| {
            let last_occurrence = items.iter().filter_map(|event| event.created_at).max()?;
            Some(ErrorBreakdown {
                error_type,
                count: items.len() as u64,
                last_occurrence,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

fn tool_metrics(events: &[&UsageEvent], names: &ToolNames) -> Vec<ToolMetrics> {
    let mut rows: Vec<ToolMetrics> = group_by(events.iter().copied(), |event| event.tool_id.clone())
        .into_iter()
        .map(|(tool_id, items)| {
            let totals = Totals::from_events(items.iter().copied());
            ToolMetrics {
                tool_name: names.display_name(&tool_id),
                tool_id,
                requests: totals.requests,
                success_rate: totals.success_rate(0),
                avg_response_time: totals.avg_response_time(),
                tokens_used: totals.tokens,
                cost: totals.cost,
                errors: error_breakdown(&items),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.requests.cmp(&a.requests));
    rows
}

fn model_metrics(events: &[&UsageEvent]) -> Vec<ModelMetrics> {
    let mut rows: Vec<ModelMetrics> =
        group_by(events.iter().copied(), |event| event.model_label().to_string())
            .into_iter()
            .map(|(model, items)| {
                let totals = Totals::from_events(items.iter().copied());
                ModelMetrics {
                    model,
                    requests: totals.requests,
                    success_rate: totals.success_rate(0),
                    avg_response_time: totals.avg_response_time(),
                    tokens_used: totals.tokens,
                    cost: totals.cost,
                    avg_tokens_per_request: rounded_average(totals.tokens, totals.requests),
                    errors: error_breakdown(&items),
                }
            })
            .collect();
    rows.sort_by(|a, b| b.requests.cmp(&a.requests));
    rows
}

fn user_metrics(events: &[&UsageEvent], active_users: u64) -> UserMetrics {
    let with_user = events
        .iter()
        .copied()
        .filter_map(|event| event.user_id.as_deref().map(|user_id| (user_id, event)));
    let mut ranked: Vec<TopUser> = group_by(with_user, |(user_id, _)| user_id.to_string())
        .into_iter()
        .map(|(user_id, items)| TopUser {
            username: mask_username(&user_id),
            requests: items.len() as u64,
            tokens_used: items
                .iter()
                .fold(0u64, |sum, (_, event)| sum.saturating_add(event.tokens())),
            user_id,
        })
        .collect();
    ranked.sort_by(|a, b| b.requests.cmp(&a.requests));
    ranked.truncate(TOP_USERS);
    UserMetrics {
        total_users: estimate_total_users(active_users),
        active_users,
        new_users: estimate_new_users(active_users),
        top_users: ranked,
    }
}

// Placeholder heuristics until a real user directory is wired in.
pub fn estimate_total_users(active_users: u64) -> u64 {
    (active_users * 2).max(ESTIMATED_USERS_FLOOR)
}

pub fn estimate_new_users(active_users: u64) -> u64 {
    active_users * 3 / 10
}

/// Display placeholder for a user; never exposes the full id.
pub fn mask_username(user_id: &str) -> String {
    let prefix: String = user_id.chars().take(MASKED_ID_CHARS).collect();
    if user_id.chars().count() > MASKED_ID_CHARS {
        format!("Utilisateur {prefix}…")
    } else {
        format!("Utilisateur {prefix}")
    }
}
