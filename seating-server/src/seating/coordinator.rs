//! Seating Coordinator
//!
//! Every operation that touches both a table and a reservation runs here,
//! inside one [`DbService::begin_write`] transaction: preconditions are read
//! and the guarded writes applied while holding the write lock, so two
//! requests for the same table cannot both succeed, and a failure part way
//! leaves neither row changed.

use super::status::{self, check_transition, invalid_transition};
use crate::db::DbService;
use crate::db::repository::{RepoError, dining_table, reservation};
use shared::models::{DiningTable, Reservation, ReservationStatus, Seating};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqliteConnection;

#[derive(Clone, Debug)]
pub struct SeatingCoordinator {
    db: DbService,
}

impl SeatingCoordinator {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Seat a booked reservation at a free table that is large enough.
    ///
    /// Preconditions are checked in order: table exists, reservation
    /// exists, reservation is booked, party fits, table is free.
    pub async fn seat(&self, table_id: i64, reservation_id: i64) -> AppResult<Seating> {
        let mut tx = self.db.begin_write().await.map_err(RepoError::from)?;

        let table = load_table(&mut tx, table_id).await?;
        let booking = load_reservation(&mut tx, reservation_id).await?;

        if booking.status == ReservationStatus::Seated {
            return Err(AppError::new(ErrorCode::ReservationAlreadySeated)
                .with_detail("reservation_id", reservation_id));
        }
        check_transition(booking.status, ReservationStatus::Seated)?;

        if booking.people > table.capacity {
            return Err(AppError::new(ErrorCode::TableCapacityExceeded)
                .with_detail("people", booking.people)
                .with_detail("capacity", table.capacity));
        }
        if table.is_occupied() {
            return Err(occupied(&table));
        }

        let table = dining_table::occupy(&mut *tx, table_id, reservation_id)
            .await?
            .ok_or_else(|| occupied(&table))?;
        let booking = reservation::transition_status(
            &mut *tx,
            reservation_id,
            ReservationStatus::Booked,
            ReservationStatus::Seated,
        )
        .await?
        .ok_or_else(|| invalid_transition(booking.status, ReservationStatus::Seated))?;

        tx.commit().await.map_err(RepoError::from)?;
        tracing::info!(table_id, reservation_id, "Reservation seated");

        Ok(Seating {
            table,
            reservation: booking,
        })
    }

    /// Free an occupied table and finish the reservation sitting at it.
    pub async fn clear(&self, table_id: i64) -> AppResult<Seating> {
        let mut tx = self.db.begin_write().await.map_err(RepoError::from)?;

        let table = load_table(&mut tx, table_id).await?;
        let Some(reservation_id) = table.reservation_id else {
            return Err(AppError::new(ErrorCode::TableNotOccupied).with_detail("table_id", table_id));
        };
        let booking = load_reservation(&mut tx, reservation_id).await?;
        check_transition(booking.status, ReservationStatus::Finished)?;

        let table = release_table(&mut tx, &table, reservation_id).await?;
        let booking = move_status(&mut tx, &booking, ReservationStatus::Finished).await?;

        tx.commit().await.map_err(RepoError::from)?;
        tracing::info!(table_id, reservation_id, "Table cleared");

        Ok(Seating {
            table,
            reservation: booking,
        })
    }

    /// Finish a seated reservation, freeing its table.
    pub async fn finish(&self, reservation_id: i64) -> AppResult<Reservation> {
        self.apply_status(reservation_id, ReservationStatus::Finished)
            .await
    }

    /// Cancel a booked or seated reservation; a seated one frees its table.
    pub async fn cancel(&self, reservation_id: i64) -> AppResult<Reservation> {
        self.apply_status(reservation_id, ReservationStatus::Cancelled)
            .await
    }

    /// Status endpoint entry point.
    ///
    /// Checks run in order: reservation exists, not finished, status value
    /// known, transition allowed. `seated` is only reachable by seating a
    /// table.
    pub async fn update_status(
        &self,
        reservation_id: i64,
        requested: Option<&str>,
    ) -> AppResult<Reservation> {
        let mut tx = self.db.begin_write().await.map_err(RepoError::from)?;

        let booking = load_reservation(&mut tx, reservation_id).await?;
        if booking.status == ReservationStatus::Finished {
            return Err(AppError::new(ErrorCode::ReservationFinished)
                .with_detail("reservation_id", reservation_id));
        }
        let target = status::parse_requested(requested)?;

        let updated = apply_in(&mut tx, &booking, target).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            reservation_id,
            from = %booking.status,
            to = %updated.status,
            "Reservation status updated"
        );
        Ok(updated)
    }

    async fn apply_status(
        &self,
        reservation_id: i64,
        target: ReservationStatus,
    ) -> AppResult<Reservation> {
        let mut tx = self.db.begin_write().await.map_err(RepoError::from)?;

        let booking = load_reservation(&mut tx, reservation_id).await?;
        let updated = apply_in(&mut tx, &booking, target).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            reservation_id,
            from = %booking.status,
            to = %updated.status,
            "Reservation status updated"
        );
        Ok(updated)
    }
}

/// Move `booking` to `target`, releasing its table when leaving `seated`
async fn apply_in(
    conn: &mut SqliteConnection,
    booking: &Reservation,
    target: ReservationStatus,
) -> AppResult<Reservation> {
    check_transition(booking.status, target)?;

    match target {
        ReservationStatus::Finished | ReservationStatus::Cancelled => {
            if booking.status == ReservationStatus::Seated
                && let Some(table) =
                    dining_table::find_by_reservation(&mut *conn, booking.reservation_id).await?
            {
                release_table(conn, &table, booking.reservation_id).await?;
            }
            move_status(conn, booking, target).await
        }
        ReservationStatus::Seated => Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            "a reservation is seated by seating it at a table",
        )
        .with_detail("current", booking.status.as_str())
        .with_detail("requested", target.as_str())),
        ReservationStatus::Booked => Err(invalid_transition(booking.status, target)),
    }
}

async fn load_table(conn: &mut SqliteConnection, table_id: i64) -> AppResult<DiningTable> {
    dining_table::find_by_id(&mut *conn, table_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::TableNotFound,
                format!("table_id {table_id} not found."),
            )
            .with_detail("table_id", table_id)
        })
}

async fn load_reservation(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> AppResult<Reservation> {
    reservation::find_by_id(&mut *conn, reservation_id)
        .await?
        .ok_or_else(|| reservation_not_found(reservation_id))
}

async fn release_table(
    conn: &mut SqliteConnection,
    table: &DiningTable,
    reservation_id: i64,
) -> AppResult<DiningTable> {
    dining_table::release(&mut *conn, table.table_id, reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::TableNotOccupied).with_detail("table_id", table.table_id)
        })
}

async fn move_status(
    conn: &mut SqliteConnection,
    booking: &Reservation,
    target: ReservationStatus,
) -> AppResult<Reservation> {
    reservation::transition_status(&mut *conn, booking.reservation_id, booking.status, target)
        .await?
        .ok_or_else(|| invalid_transition(booking.status, target))
}

fn occupied(table: &DiningTable) -> AppError {
    AppError::new(ErrorCode::TableOccupied).with_detail("table_id", table.table_id)
}

pub fn reservation_not_found(reservation_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::ReservationNotFound,
        format!("reservation_id {reservation_id} not found."),
    )
    .with_detail("reservation_id", reservation_id)
}
