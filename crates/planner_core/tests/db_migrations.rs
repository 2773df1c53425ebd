use chrono::{Duration, TimeZone, Utc};
use planner_core::db::migrations::latest_version;
use planner_core::db::{open_db, open_db_in_memory};
use planner_core::{KvError, KvStore, SqliteKvStore, Task, TaskDraft, TaskSelector, TaskStore};
use rusqlite::{params, Connection};

const KEY: &str = "planner-tasks";

const LEGACY_BLOB: &str = r#"[
    {"text": "water plants", "done": false, "dueDate": "2025-06-10",
     "createdAt": "2025-06-01T10:00:00.250Z"},
    {"text": "broken", "createdAt": "yesterday"}
]"#;

/// Lays out a database as the first planner release left it.
fn write_v1_database(path: &std::path::Path, blob: &str) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_entries (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );
        PRAGMA user_version = 1;",
    )
    .unwrap();
    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES (?1, ?2);",
        params![KEY, blob],
    )
    .unwrap();
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn fresh_in_memory_database_is_ready_for_task_storage() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(user_version(&conn), latest_version());

    let store = TaskStore::new(SqliteKvStore::new(&conn), KEY);
    assert!(store.load_all().is_empty());
    store.create(TaskDraft::new("first")).unwrap().unwrap();
    assert_eq!(store.load_all().len(), 1);
}

#[test]
fn upgrade_writes_ids_that_match_previously_derived_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.db");
    write_v1_database(&path, LEGACY_BLOB);

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());

    let raw = SqliteKvStore::new(&conn).get(KEY).unwrap().unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    let created_at =
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap() + Duration::milliseconds(250);
    let expected = Task::legacy_id("water plants", &created_at);
    assert_eq!(records[0]["id"], expected.to_string());
    // Records the upgrade cannot read are kept as they were.
    assert!(records[1].get("id").is_none());

    let store = TaskStore::new(SqliteKvStore::new(&conn), KEY);
    assert!(store.toggle_done(&TaskSelector::Id(expected)).unwrap());
    assert!(store.find(&TaskSelector::Id(expected)).unwrap().done);
}

#[test]
fn reopening_upgraded_database_leaves_blob_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.db");
    write_v1_database(&path, LEGACY_BLOB);

    let first = {
        let conn = open_db(&path).unwrap();
        SqliteKvStore::new(&conn).get(KEY).unwrap()
    };
    let conn = open_db(&path).unwrap();
    assert_eq!(SqliteKvStore::new(&conn).get(KEY).unwrap(), first);
}

#[test]
fn database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 42;")
        .unwrap();

    match open_db(&path).unwrap_err() {
        KvError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}
