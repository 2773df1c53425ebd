//! Core domain logic for the day planner widget.
//! This crate owns the task model, date-range queries and week bar layout;
//! storage and drawing stay behind the `KvStore` and `RenderTarget` seams.

pub mod config;
pub mod dates;
pub mod db;
pub mod layout;
pub mod logging;
pub mod model;
pub mod query;
pub mod render;
pub mod service;
pub mod store;

pub use config::{BarMetrics, ConfigError, PlannerConfig};
pub use dates::{ordinal_suffix, parse_date_key, to_date_key, week_anchor, Week};
pub use layout::week_bars::{layout_week_bars, BarDescriptor, BarKind, BarStack, DueMarker};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{
    DateEdit, DateTimeField, DateTimeParseError, Task, TaskDraft, TaskId, TaskSelector,
    TaskValidationError,
};
pub use render::views::{
    render_all, AllTasksView, CellTag, DayListView, MonthGridView, RenderTarget, WeekStripView,
};
pub use service::planner_service::{PlannerAction, PlannerService, TaskForm};
pub use store::kv::{KvError, KvResult, KvStore, MemoryKvStore};
pub use store::sqlite_kv::SqliteKvStore;
pub use store::task_store::{StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
