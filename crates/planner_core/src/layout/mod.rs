//! Index-based layout for the week strip.
//!
//! # Responsibility
//! - Turn tasks intersecting a week into ordered bar descriptors.
//! - Compute the vertical stack geometry for those bars.
//!
//! # Invariants
//! - Output depends only on the input week and tasks.
//! - Geometry is expressed as day indices (0-6) and layout units; converting
//!   to screen pixels belongs to the render target.

pub mod week_bars;
