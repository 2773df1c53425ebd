//! SQLite home of the persistent key-value backend.
//!
//! # Responsibility
//! - Open connections ready for `SqliteKvStore`.
//! - Upgrade stored task blobs along with the schema.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No key-value reads or writes happen before migrations succeed.
//! - Failures surface as `KvError`, the same error the store layer sees.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
