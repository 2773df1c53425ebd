//! Ordered upgrades for the planner database.
//!
//! Steps are either schema SQL or a data pass over stored blobs.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - Pending steps run inside one transaction and bump `PRAGMA user_version`
//!   as they go.
//! - Data passes leave values they cannot parse untouched.

use crate::model::task::Task;
use crate::store::kv::{KvError, KvResult};
use log::info;
use rusqlite::{params, Connection};

enum Step {
    Sql(&'static str),
    Data(fn(&Connection) -> KvResult<usize>),
}

struct Migration {
    version: u32,
    name: &'static str,
    step: Step,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "kv_entries",
        step: Step::Sql(include_str!("0001_kv_entries.sql")),
    },
    Migration {
        version: 2,
        name: "task_ids",
        step: Step::Data(backfill_task_ids),
    },
];

/// Latest schema version this build knows how to produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `KvError::SchemaTooNew` when the file was written by a newer build.
/// - `KvError::Sqlite` when a step fails; nothing is applied.
pub fn apply_migrations(conn: &mut Connection) -> KvResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(KvError::SchemaTooNew { found, supported });
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > found) {
        let touched = match migration.step {
            Step::Sql(sql) => {
                tx.execute_batch(sql)?;
                0
            }
            Step::Data(pass) => pass(&tx)?,
        };
        tx.pragma_update(None, "user_version", migration.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} name={} rows={touched}",
            migration.version, migration.name
        );
    }
    tx.commit()?;
    Ok(())
}

/// Writes a stable `id` into every stored task record that lacks one.
///
/// Records keep the id they would have been given on read, so selectors
/// taken before the upgrade still match.
fn backfill_task_ids(conn: &Connection) -> KvResult<usize> {
    let entries = {
        let mut stmt = conn.prepare("SELECT key, value FROM kv_entries;")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let mut rewritten = 0;
    for (key, value) in entries {
        let Some(upgraded) = with_task_ids(&value) else {
            continue;
        };
        conn.execute(
            "UPDATE kv_entries SET value = ?1 WHERE key = ?2;",
            params![upgraded, key],
        )?;
        rewritten += 1;
    }
    Ok(rewritten)
}

fn with_task_ids(raw: &str) -> Option<String> {
    let mut records: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
    let mut changed = false;
    for record in &mut records {
        changed |= Task::backfill_record_id(record);
    }
    if !changed {
        return None;
    }
    serde_json::to_string(&records).ok()
}
