//! Shared types for the price tag station
//!
//! The label data model used by both the printer plumbing and the station:
//! committed queue records, transient drafts, and the read-only view the
//! encoder renders from.

pub mod models;
pub mod util;

// Re-exports
pub use models::{Draft, LabelContent, LabelError, LabelId, QueuedLabel};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
