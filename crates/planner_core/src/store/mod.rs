//! Persistence layer for the task collection.
//!
//! # Responsibility
//! - Define the key-value storage contract the widget runs against.
//! - Load, rewrite and mutate the single serialized task collection.
//!
//! # Invariants
//! - The whole collection lives under one key and is rewritten on every
//!   mutation (last write wins).
//! - Unparseable persisted data reads as an empty collection.

pub mod kv;
pub mod sqlite_kv;
pub mod task_store;
