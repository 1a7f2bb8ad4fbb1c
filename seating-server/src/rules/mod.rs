//! Booking rules
//!
//! Pure checks on incoming payloads. Nothing here touches the database;
//! the current time is passed in so results are reproducible.

pub mod reservation;
pub mod table;
pub mod temporal;

pub use reservation::{ReservationDraft, ValidationMode, validate_reservation};
pub use table::{TableDraft, validate_table};
