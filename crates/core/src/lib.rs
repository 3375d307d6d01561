use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label used when an event carries no model or no error type.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Error,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One AI-tool invocation as persisted by the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    pub tool_id: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: EventStatus,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UsageEvent {
    pub fn is_success(&self) -> bool {
        self.status == EventStatus::Success
    }

    pub fn model_label(&self) -> &str {
        non_empty(self.model.as_deref()).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn error_label(&self) -> &str {
        non_empty(self.error_type.as_deref()).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn response_time(&self) -> u64 {
        self.response_time_ms.unwrap_or(0)
    }

    pub fn tokens(&self) -> u64 {
        self.tokens_used.unwrap_or(0)
    }

    pub fn cost_value(&self) -> f64 {
        self.cost.filter(|value| value.is_finite()).unwrap_or(0.0)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Logical range tokens accepted by the analytics surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRangeKey {
    #[serde(rename = "1h")]
    LastHour,
    #[default]
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
}

impl TimeRangeKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1h" => Some(Self::LastHour),
            "24h" => Some(Self::LastDay),
            "7d" => Some(Self::LastWeek),
            "30d" => Some(Self::LastMonth),
            _ => None,
        }
    }

    /// Unknown or missing tokens fall back to `24h`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::LastDay => "24h",
            Self::LastWeek => "7d",
            Self::LastMonth => "30d",
        }
    }
}

/// Half-open `[start, end)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilters {
    #[serde(default)]
    pub tool_ids: Vec<String>,
    #[serde(default)]
    pub models: Vec<String>,
}

impl EventFilters {
    pub fn is_empty(&self) -> bool {
        self.tool_ids.is_empty() && self.models.is_empty()
    }

    pub fn matches(&self, event: &UsageEvent) -> bool {
        let tool_ok =
            self.tool_ids.is_empty() || self.tool_ids.iter().any(|id| *id == event.tool_id);
        let model_ok =
            self.models.is_empty() || self.models.iter().any(|model| model == event.model_label());
        tool_ok && model_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub avg_response_time: u64,
    pub total_tokens_used: u64,
    pub total_cost: f64,
    pub active_users: u64,
    pub popular_tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub requests: u64,
    pub success_rate: u32,
    pub response_time: u64,
    pub tokens_used: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBreakdown {
    #[serde(rename = "type")]
    pub error_type: String,
    pub count: u64,
    pub last_occurrence: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetrics {
    pub tool_id: String,
    pub tool_name: String,
    pub requests: u64,
    pub success_rate: u32,
    pub avg_response_time: u64,
    pub tokens_used: u64,
    pub cost: f64,
    pub errors: Vec<ErrorBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub model: String,
    pub requests: u64,
    pub success_rate: u32,
    pub avg_response_time: u64,
    pub tokens_used: u64,
    pub cost: f64,
    pub avg_tokens_per_request: u64,
    pub errors: Vec<ErrorBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUser {
    pub user_id: String,
    pub username: String,
    pub requests: u64,
    pub tokens_used: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    pub total_users: u64,
    pub active_users: u64,
    pub new_users: u64,
    pub top_users: Vec<TopUser>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
}

/// Full analytics payload served for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub overview: AnalyticsOverview,
    pub time_series_data: Vec<TimeSeriesPoint>,
    pub tool_metrics: Vec<ToolMetrics>,
    pub model_metrics: Vec<ModelMetrics>,
    pub user_metrics: UserMetrics,
    pub alerts: Vec<Alert>,
}
