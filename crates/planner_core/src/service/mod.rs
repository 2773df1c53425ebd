//! Core use-case services.
//!
//! # Responsibility
//! - Translate widget events into task store mutations.
//! - Drive the full re-render pass after every mutation.

pub mod planner_service;
