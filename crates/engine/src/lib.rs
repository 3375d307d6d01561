mod aggregate;
mod alerts;
mod error;
mod fallback;
mod group;
mod names;
mod pipeline;
mod source;
mod window;

pub use aggregate::{aggregate, estimate_new_users, estimate_total_users, mask_username};
pub use alerts::{AlertThresholds, HIGH_ERROR_RATE_ALERT, SLOW_RESPONSE_ALERT, evaluate_alerts};
pub use error::{EngineError, Result, Stage};
pub use fallback::{DEMO_DATA_ALERT, generate_fallback};
pub use group::{group_by, percentage, rounded_average};
pub use names::{ToolNames, distinct_tool_ids, fallback_tool_name, resolve_tool_names};
pub use pipeline::{AnalyticsPipeline, AnalyticsQuery, FetchBudget, PipelineOptions};
pub use source::{
    EventSource, InMemoryEventSource, NameResolver, StaticNameResolver, UpstreamError,
};
pub use window::{BucketPlan, RangeShape, plan_window, range_shape};
