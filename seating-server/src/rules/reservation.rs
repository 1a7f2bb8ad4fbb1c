//! Reservation payload validation
//!
//! Checks run in a fixed order and the first failure is returned. The day
//! check is the exception: "in the past" and "closed on Tuesday" are
//! reported together.

use super::temporal::{
    parse_date, parse_time, validate_business_hours, validate_future_and_open_day,
};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, required_positive_int, required_text};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shared::models::{ReservationPayload, ReservationStatus};
use shared::{AppError, AppResult, ErrorCode};

/// Which request the payload came from; only affects status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// A payload that passed every check, with date and time parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationDraft {
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub people: i32,
}

impl ReservationDraft {
    /// Canonical storage form `YYYY-MM-DD`
    pub fn date_text(&self) -> String {
        self.reservation_date.format("%Y-%m-%d").to_string()
    }

    /// Canonical storage form `HH:MM:SS`
    pub fn time_text(&self) -> String {
        self.reservation_time.format("%H:%M:%S").to_string()
    }
}

/// Validate a create/update payload against the booking rules at `now`.
pub fn validate_reservation(
    payload: &ReservationPayload,
    mode: ValidationMode,
    now: NaiveDateTime,
) -> AppResult<ReservationDraft> {
    let first_name = required_text(payload.first_name.as_deref(), "first_name", MAX_NAME_LEN)?;
    let last_name = required_text(payload.last_name.as_deref(), "last_name", MAX_NAME_LEN)?;

    let date_text = required_text(
        payload.reservation_date.as_deref(),
        "reservation_date",
        MAX_SHORT_TEXT_LEN,
    )?;
    let reservation_date = parse_date(&date_text)?;

    let time_text = required_text(
        payload.reservation_time.as_deref(),
        "reservation_time",
        MAX_SHORT_TEXT_LEN,
    )?;
    let reservation_time = parse_time(&time_text)?;

    let people = required_positive_int(payload.people.as_ref(), "people")?;
    let mobile_number = required_text(
        payload.mobile_number.as_deref(),
        "mobile_number",
        MAX_SHORT_TEXT_LEN,
    )?;

    validate_future_and_open_day(reservation_date, reservation_time, now)?;
    validate_business_hours(reservation_date, reservation_time)?;
    check_status_field(payload.status.as_deref(), mode)?;

    Ok(ReservationDraft {
        first_name,
        last_name,
        mobile_number,
        reservation_date,
        reservation_time,
        people,
    })
}

/// A payload may carry `status` only as absent, null or `booked`
fn check_status_field(status: Option<&str>, mode: ValidationMode) -> AppResult<()> {
    let Some(status) = status else {
        return Ok(());
    };
    if status == ReservationStatus::Booked.as_str() {
        return Ok(());
    }

    let message = match mode {
        ValidationMode::Create => format!("status {status} is invalid for a new reservation"),
        ValidationMode::Update => format!(
            "status {status} cannot be set by editing; use /reservations/{{id}}/status"
        ),
    };
    Err(AppError::with_message(ErrorCode::InvalidStatus, message).with_detail("status", status))
}
