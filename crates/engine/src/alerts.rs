use chrono::{DateTime, Duration, Utc};
use insights_core::{Alert, AlertKind, UsageEvent};

pub const HIGH_ERROR_RATE_ALERT: &str = "high-error-rate";
pub const SLOW_RESPONSE_ALERT: &str = "slow-response";

/// Limits above which an alert is raised. Comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub error_rate_percent: f64,
    pub avg_response_ms: f64,
    pub lookback: Duration,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            error_rate_percent: 10.0,
            avg_response_ms: 5000.0,
            lookback: Duration::hours(1),
        }
    }
}

/// Raises at most one alert per rule from events newer than `now - lookback`.
///
/// Alert ids are fixed per rule so repeated evaluations can be deduplicated
/// by whoever stores resolution state.
pub fn evaluate_alerts(
    events: &[UsageEvent],
    now: DateTime<Utc>,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let since = now - thresholds.lookback;
    let recent: Vec<&UsageEvent> = events
        .iter()
        .filter(|event| event.created_at.is_some_and(|ts| ts > since))
        .collect();
    if recent.is_empty() {
        return Vec::new();
    }

    let count = recent.len() as f64;
    let failures = recent.iter().filter(|event| !event.is_success()).count() as f64;
    let error_rate = failures * 100.0 / count;
    let response_total = recent
        .iter()
        .fold(0u64, |sum, event| sum.saturating_add(event.response_time()));
    let avg_response = response_total as f64 / count;
    let period = describe_lookback(thresholds.lookback);

    let mut alerts = Vec::new();
    if error_rate > thresholds.error_rate_percent {
        alerts.push(Alert {
            id: HIGH_ERROR_RATE_ALERT.to_string(),
            kind: AlertKind::Error,
            message: format!(
                "high error rate: {}% in the {period}",
                error_rate.round() as u64
            ),
            timestamp: now,
            resolved: false,
        });
    }
    if avg_response > thresholds.avg_response_ms {
        alerts.push(Alert {
            id: SLOW_RESPONSE_ALERT.to_string(),
            kind: AlertKind::Warning,
            message: format!(
                "slow response detected: {}ms average",
                avg_response.round() as u64
            ),
            timestamp: now,
            resolved: false,
        });
    }
    if !alerts.is_empty() {
        tracing::info!(
            alerts = alerts.len(),
            sample = recent.len(),
            error_rate,
            avg_response,
            "raised usage alerts"
        );
    }
    alerts
}

fn describe_lookback(lookback: Duration) -> String {
    match lookback.num_minutes() {
        60 => "last hour".to_string(),
        minutes if minutes % 60 == 0 => format!("last {} hours", minutes / 60),
        minutes => format!("last {minutes} minutes"),
    }
}
