//! Declarative view models and the render target seam.
//!
//! # Responsibility
//! - Build day list, week strip, month grid and task management views.
//! - Hand finished views to a `RenderTarget` adapter.
//!
//! # Invariants
//! - View builders only read tasks; they never touch storage.

pub mod views;
