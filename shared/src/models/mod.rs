//! Data models
//!
//! A label exists in two shapes with different lifecycles:
//! - [`Draft`]: transient form state, never has an id, never queued
//! - [`QueuedLabel`]: a committed record with a stable id

pub mod label;

// Re-exports
pub use label::*;
