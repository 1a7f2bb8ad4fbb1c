//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::reservation::Reservation;

/// Dining table entity (桌台)
///
/// `reservation_id` is set while a seated reservation occupies the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub table_id: i64,
    pub table_name: String,
    pub capacity: i32,
    pub reservation_id: Option<i64>,
    pub created_at: i64,
}

impl DiningTable {
    pub fn is_occupied(&self) -> bool {
        self.reservation_id.is_some()
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableCreate {
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub capacity: Option<serde_json::Value>,
}

/// Seat request payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatRequest {
    #[serde(default)]
    pub reservation_id: Option<serde_json::Value>,
}

/// Both sides of a seat/clear after commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seating {
    pub table: DiningTable,
    pub reservation: Reservation,
}
