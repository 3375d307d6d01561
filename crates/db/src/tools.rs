use rusqlite::{OptionalExtension, params};

use crate::Db;
use crate::error::Result;

impl Db {
    pub fn upsert_tool(&mut self, tool_id: &str, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tool (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![tool_id, name],
        )?;
        Ok(())
    }

    pub fn tool_name(&self, tool_id: &str) -> Result<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT name FROM tool WHERE id = ?1",
                params![tool_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }
}
