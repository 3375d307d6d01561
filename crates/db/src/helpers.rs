use chrono::{DateTime, SecondsFormat, Utc};
use insights_core::{EventFilters, EventStatus, UNKNOWN_LABEL, UsageEvent};
use rusqlite::Row;
use rusqlite::types::Value;

use crate::error::Result;

/// Fixed-width UTC text so lexical order matches time order.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_ts(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

pub(crate) fn parse_status(value: &str) -> EventStatus {
    if value.eq_ignore_ascii_case(EventStatus::Success.as_str()) {
        EventStatus::Success
    } else {
        EventStatus::Error
    }
}

pub(crate) struct StoredEvent {
    pub event: UsageEvent,
    pub created_at: Option<String>,
}

pub(crate) fn row_to_stored_event(
    row: &Row<'_>,
) -> std::result::Result<StoredEvent, rusqlite::Error> {
    let status: String = row.get(3)?;
    Ok(StoredEvent {
        event: UsageEvent {
            tool_id: row.get(0)?,
            model: row.get(1)?,
            user_id: row.get(2)?,
            status: parse_status(&status),
            response_time_ms: row.get::<_, Option<i64>>(4)?.map(|value| value.max(0) as u64),
            tokens_used: row.get::<_, Option<i64>>(5)?.map(|value| value.max(0) as u64),
            cost: row.get(6)?,
            error_type: row.get(7)?,
            created_at: None,
        },
        created_at: row.get(8)?,
    })
}

/// Appends `AND ...` clauses for the filters, numbering parameters after
/// the ones already bound.
pub(crate) fn push_filter_clauses(sql: &mut String, bound: &mut Vec<Value>, filters: &EventFilters) {
    if !filters.tool_ids.is_empty() {
        let placeholders = placeholders(bound.len(), filters.tool_ids.len());
        sql.push_str(&format!(" AND tool_id IN ({placeholders})"));
        bound.extend(filters.tool_ids.iter().cloned().map(Value::Text));
    }
    if !filters.models.is_empty() {
        let placeholders = placeholders(bound.len(), filters.models.len());
        sql.push_str(&format!(
            " AND COALESCE(NULLIF(TRIM(model), ''), '{UNKNOWN_LABEL}') IN ({placeholders})"
        ));
        bound.extend(filters.models.iter().cloned().map(Value::Text));
    }
}

fn placeholders(offset: usize, count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{}", offset + index))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamps_sort_lexically() {
        let early = format_ts(Utc.with_ymd_and_hms(2025, 3, 9, 9, 0, 0).unwrap());
        let late = format_ts(Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap());
        assert_eq!(early, "2025-03-09T09:00:00.000Z");
        assert!(early < late);
        assert_eq!(
            parse_ts(&late).expect("parse"),
            Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn filter_clauses_number_after_bound_params() {
        let mut sql = String::from("WHERE created_at >= ?1 AND created_at < ?2");
        let mut bound = vec![Value::Text("a".into()), Value::Text("b".into())];
        let filters = EventFilters {
            tool_ids: vec!["titles".into(), "icp-maker".into()],
            models: vec!["gpt-4o".into()],
        };
        push_filter_clauses(&mut sql, &mut bound, &filters);
        assert!(sql.contains("tool_id IN (?3, ?4)"));
        assert!(sql.ends_with("IN (?5)"));
        assert_eq!(bound.len(), 5);
    }
}
