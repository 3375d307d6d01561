use insights_core::{EventFilters, TimeRangeKey};
use insights_engine::AnalyticsQuery;
use serde::{Deserialize, Serialize};

/// Raw `/analytics` query parameters, before validation.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    pub time_range: Option<String>,
    pub tools: Option<String>,
    pub models: Option<String>,
}

impl AnalyticsParams {
    pub fn to_query(&self) -> AnalyticsQuery {
        let requested = self.time_range.as_deref().map(str::trim);
        let range = TimeRangeKey::parse_or_default(requested);
        if let Some(token) = requested.filter(|token| TimeRangeKey::parse(token).is_none()) {
            tracing::debug!(token, fallback = range.as_str(), "unrecognized time range");
        }
        AnalyticsQuery {
            range,
            filters: EventFilters {
                tool_ids: split_csv(self.tools.as_deref()),
                models: split_csv(self.models.as_deref()),
            },
        }
    }
}

fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_filters() {
        let params = AnalyticsParams {
            time_range: Some("7d".to_string()),
            tools: Some(" icp-maker, ,titles ".to_string()),
            models: Some(String::new()),
        };
        let query = params.to_query();
        assert_eq!(query.range, TimeRangeKey::LastWeek);
        assert_eq!(query.filters.tool_ids, vec!["icp-maker", "titles"]);
        assert!(query.filters.models.is_empty());
    }

    #[test]
    fn unknown_range_falls_back_to_last_day() {
        let params = AnalyticsParams {
            time_range: Some("90d".to_string()),
            ..AnalyticsParams::default()
        };
        assert_eq!(params.to_query().range, TimeRangeKey::LastDay);
        assert_eq!(AnalyticsParams::default().to_query(), AnalyticsQuery::default());
    }
}
