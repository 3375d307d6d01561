#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use insights_core::{EventStatus, UsageEvent};
use insights_db::Db;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn insert_events(db: &mut Db, events: Vec<UsageEvent>) {
    db.insert_usage_events(&events).expect("insert events");
}

pub fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

pub fn make_event(tool_id: &str, model: Option<&str>, created_at: DateTime<Utc>) -> UsageEvent {
    UsageEvent {
        tool_id: tool_id.to_string(),
        model: model.map(str::to_string),
        user_id: Some("user-1".to_string()),
        status: EventStatus::Success,
        response_time_ms: Some(900),
        tokens_used: Some(420),
        cost: Some(0.0042),
        error_type: None,
        created_at: Some(created_at),
    }
}
