use insights_app::AnalyticsParams;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    pub time_range: Option<String>,
    pub tools: Option<String>,
    pub models: Option<String>,
}

impl From<AnalyticsRequest> for AnalyticsParams {
    fn from(req: AnalyticsRequest) -> Self {
        Self {
            time_range: req.time_range,
            tools: req.tools,
            models: req.models,
        }
    }
}
