//! Data models
//!
//! Shared between the seating server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod dining_table;
pub mod reservation;

// Re-exports
pub use dining_table::*;
pub use reservation::*;
