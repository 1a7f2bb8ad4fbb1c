//! Seating: status transitions and the table/reservation coordinator

pub mod coordinator;
pub mod status;

pub use coordinator::SeatingCoordinator;
