use chrono::Duration;
use insights_core::{
    Alert, AlertKind, AnalyticsOverview, AnalyticsReport, ErrorBreakdown, ModelMetrics,
    TimeSeriesPoint, ToolMetrics, TopUser, UserMetrics,
};
use rand::Rng;

use crate::aggregate::{estimate_new_users, estimate_total_users, mask_username};
use crate::group::{percentage, rounded_average};
use crate::window::BucketPlan;

pub const DEMO_DATA_ALERT: &str = "demo-data";

const SUCCESS_RATIO: f64 = 0.95;
const COST_PER_TOKEN: f64 = 0.000_012;
const DEMO_TOOLS: &[(&str, &str, f64)] = &[
    ("icp-maker", "ICP Maker", 0.34),
    ("titles", "Générateur de titres", 0.26),
    ("email-sequences", "Séquences email", 0.18),
    ("landing-copy", "Copy de landing page", 0.13),
    ("persona-builder", "Persona builder", 0.09),
];
const DEMO_MODELS: &[(&str, f64)] = &[
    ("gpt-4o", 0.48),
    ("gpt-4o-mini", 0.32),
    ("claude-3-5-sonnet", 0.20),
];
const DEMO_ERROR_TYPES: &[&str] = &["Timeout", "RateLimit"];
const DEMO_TOP_USERS: usize = 10;

#[derive(Debug, Clone, Copy)]
struct Slice {
    requests: u64,
    successes: u64,
}

/// Illustrative report for a window with no recorded usage.
///
/// Values are random but follow the plan's bucket layout and the same
/// invariants as a real aggregation: non-negative counts, whole-number
/// percentages and rollups sorted by request count.
pub fn generate_fallback<R: Rng>(plan: &BucketPlan, rng: &mut R) -> AnalyticsReport {
    let now = plan.now();
    let span_minutes = (plan.window.end - plan.window.start).num_minutes().max(1);
    let bucket_hours = plan.width.num_minutes() as f64 / 60.0;

    let mut total = Slice {
        requests: 0,
        successes: 0,
    };
    let mut response_total = 0u64;
    let mut tokens_total = 0u64;
    let mut cost_total = 0.0;
    let mut series = Vec::with_capacity(plan.buckets.len());
    for bucket in &plan.buckets {
        let per_hour: f64 = rng.gen_range(20.0..80.0);
        let requests = ((per_hour * bucket_hours).round() as u64).max(1);
        let slice = split_success(requests, rng);
        let response_time = rng.gen_range(800..2500u64);
        let tokens = requests * rng.gen_range(400..1200u64);
        let cost = tokens as f64 * COST_PER_TOKEN;

        total.requests += requests;
        total.successes += slice.successes;
        response_total += response_time * requests;
        tokens_total += tokens;
        cost_total += cost;
        series.push(TimeSeriesPoint {
            timestamp: bucket.start,
            requests,
            success_rate: percentage(slice.successes, requests, 100),
            response_time,
            tokens_used: tokens,
            cost,
        });
    }

    let shares: Vec<f64> = DEMO_TOOLS.iter().map(|(_, _, share)| *share).collect();
    let mut tool_metrics: Vec<ToolMetrics> = DEMO_TOOLS
        .iter()
        .zip(distribute(total.requests, &shares))
        .map(|(&(tool_id, tool_name, _), requests)| {
            let slice = split_success(requests, rng);
            let tokens = requests * rng.gen_range(400..1200u64);
            ToolMetrics {
                tool_id: tool_id.to_string(),
                tool_name: tool_name.to_string(),
                requests,
                success_rate: percentage(slice.successes, requests, 0),
                avg_response_time: rng.gen_range(800..2500),
                tokens_used: tokens,
                cost: tokens as f64 * COST_PER_TOKEN,
                errors: demo_errors(slice, span_minutes, plan, rng),
            }
        })
        .collect();
    tool_metrics.sort_by(|a, b| b.requests.cmp(&a.requests));

    let shares: Vec<f64> = DEMO_MODELS.iter().map(|(_, share)| *share).collect();
    let mut model_metrics: Vec<ModelMetrics> = DEMO_MODELS
        .iter()
        .zip(distribute(total.requests, &shares))
        .map(|(&(model, _), requests)| {
            let slice = split_success(requests, rng);
            let tokens = requests * rng.gen_range(400..1200u64);
            ModelMetrics {
                model: model.to_string(),
                requests,
                success_rate: percentage(slice.successes, requests, 0),
                avg_response_time: rng.gen_range(800..2500),
                tokens_used: tokens,
                cost: tokens as f64 * COST_PER_TOKEN,
                avg_tokens_per_request: rounded_average(tokens, requests),
                errors: demo_errors(slice, span_minutes, plan, rng),
            }
        })
        .collect();
    model_metrics.sort_by(|a, b| b.requests.cmp(&a.requests));

    let active_users = rng.gen_range(15..=60u64);
    let per_user_cap = (total.requests / DEMO_TOP_USERS as u64).max(1);
    let mut top_users: Vec<TopUser> = (1..=DEMO_TOP_USERS)
        .map(|index| {
            let user_id = format!("demo-user-{index:02}");
            let requests = rng.gen_range(1..=per_user_cap);
            TopUser {
                username: mask_username(&user_id),
                user_id,
                requests,
                tokens_used: requests * rng.gen_range(400..1200u64),
            }
        })
        .collect();
    top_users.sort_by(|a, b| b.requests.cmp(&a.requests));

    AnalyticsReport {
        overview: AnalyticsOverview {
            total_requests: total.requests,
            successful_requests: total.successes,
            failed_requests: total.requests - total.successes,
            avg_response_time: rounded_average(response_total, total.requests),
            total_tokens_used: tokens_total,
            total_cost: cost_total,
            active_users,
            popular_tools: tool_metrics
                .iter()
                .take(5)
                .map(|tool| tool.tool_id.clone())
                .collect(),
        },
        time_series_data: series,
        tool_metrics,
        model_metrics,
        user_metrics: UserMetrics {
            total_users: estimate_total_users(active_users),
            active_users,
            new_users: estimate_new_users(active_users),
            top_users,
        },
        alerts: vec![Alert {
            id: DEMO_DATA_ALERT.to_string(),
            kind: AlertKind::Info,
            message: "no usage recorded in this window; showing illustrative data".to_string(),
            timestamp: now,
            resolved: false,
        }],
    }
}

fn split_success<R: Rng>(requests: u64, rng: &mut R) -> Slice {
    let ratio = (SUCCESS_RATIO + rng.gen_range(-0.03..0.03)).clamp(0.0, 1.0);
    Slice {
        requests,
        successes: (requests as f64 * ratio).round() as u64,
    }
}

/// Splits `total` by weight; the remainder goes to the first entry.
fn distribute(total: u64, shares: &[f64]) -> Vec<u64> {
    let mut parts: Vec<u64> = shares
        .iter()
        .map(|share| (total as f64 * share).floor() as u64)
        .collect();
    let assigned: u64 = parts.iter().sum();
    if let Some(first) = parts.first_mut() {
        *first += total.saturating_sub(assigned);
    }
    parts
}

fn demo_errors<R: Rng>(
    slice: Slice,
    span_minutes: i64,
    plan: &BucketPlan,
    rng: &mut R,
) -> Vec<ErrorBreakdown> {
    let failures = slice.requests - slice.successes;
    let minor = failures / 3;
    let counts = [failures - minor, minor];
    DEMO_ERROR_TYPES
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(error_type, count)| ErrorBreakdown {
            error_type: error_type.to_string(),
            count,
            last_occurrence: plan.now() - Duration::minutes(rng.gen_range(1..=span_minutes)),
        })
        .collect()
}
