//! Date-range queries over the task collection.
//!
//! Pure functions: plain task slices in, borrowed matches out. Nothing here
//! touches storage.

pub mod range;
