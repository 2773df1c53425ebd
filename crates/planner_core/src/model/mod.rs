//! Domain model for planner tasks.
//!
//! # Responsibility
//! - Define the single persistent entity (`Task`) and its wire shape.
//! - Keep bare-date and date-time fields consistent at every write.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - A task carrying a date-time also carries the matching bare date.

pub mod task;
