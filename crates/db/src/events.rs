use insights_core::{EventFilters, TimeRange, UsageEvent};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};

use crate::Db;
use crate::error::Result;
use crate::helpers::{format_ts, parse_ts, push_filter_clauses, row_to_stored_event};

impl Db {
    pub fn insert_usage_events(&mut self, events: &[UsageEvent]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO usage_event (
                  tool_id, model, user_id, status, response_time_ms, tokens_used,
                  cost, error_type, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;
            for event in events {
                inserted += stmt.execute(params![
                    event.tool_id,
                    event.model,
                    event.user_id,
                    event.status.as_str(),
                    event.response_time_ms.map(|value| value as i64),
                    event.tokens_used.map(|value| value as i64),
                    event.cost,
                    event.error_type,
                    event.created_at.map(format_ts),
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Events created inside `[range.start, range.end)` matching `filters`,
    /// oldest first. Rows without a timestamp never match a range.
    pub fn list_usage_events(
        &self,
        range: &TimeRange,
        filters: &EventFilters,
    ) -> Result<Vec<UsageEvent>> {
        let mut sql = String::from(
            r#"
            SELECT tool_id, model, user_id, status, response_time_ms, tokens_used,
                   cost, error_type, created_at
            FROM usage_event
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        );
        let mut bound = vec![
            Value::Text(format_ts(range.start)),
            Value::Text(format_ts(range.end)),
        ];
        push_filter_clauses(&mut sql, &mut bound, filters);
        sql.push_str(" ORDER BY created_at ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bound), row_to_stored_event)?;
        let mut events = Vec::new();
        for row in rows {
            let stored = row?;
            let mut event = stored.event;
            event.created_at = stored.created_at.as_deref().map(parse_ts).transpose()?;
            events.push(event);
        }
        Ok(events)
    }

    pub fn count_usage_events(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM usage_event", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
