//! Date and time checks for reservations
//!
//! Dates and times arrive as separate strings because that is how booking
//! forms submit them. They are parsed independently and only combined into a
//! single instant for the range checks; storage keeps them separate.
//!
//! All comparisons are local wall-clock time; no timezone conversion.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use shared::{AppError, AppResult, ErrorCode};

pub const MIN_YEAR: i32 = 1902;
pub const MAX_YEAR: i32 = 2100;

/// First acceptable seating, minutes after midnight (10:30)
pub const OPENING_MINUTE: u32 = 10 * 60 + 30;
/// Seatings must start strictly before this (21:30)
pub const LAST_SEATING_MINUTE: u32 = 21 * 60 + 30;

pub const CLOSED_WEEKDAY: Weekday = Weekday::Tue;

fn is_digits(text: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parse `YYYY-M-D` (one or two digit month and day)
///
/// Components are checked day, month, then year, and the first bad one is
/// named in the error.
pub fn parse_date(text: &str) -> AppResult<NaiveDate> {
    let format_error = || {
        AppError::invalid_format(
            "reservation_date",
            format!("reservation_date - Invalid date format: {text}"),
        )
    };

    let parts: Vec<&str> = text.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(format_error());
    };
    if !is_digits(year, 4, 4) || !is_digits(month, 1, 2) || !is_digits(day, 1, 2) {
        return Err(format_error());
    }

    // digit-only strings of bounded length always parse
    let year: i32 = year.parse().map_err(|_| format_error())?;
    let month: u32 = month.parse().map_err(|_| format_error())?;
    let day: u32 = day.parse().map_err(|_| format_error())?;

    if !(1..=31).contains(&day) {
        return Err(out_of_range(
            "reservation_date",
            format!("reservation_date - Invalid value for day: {day}"),
        ));
    }
    if !(1..=12).contains(&month) {
        return Err(out_of_range(
            "reservation_date",
            format!("reservation_date - Invalid value for month: {month}"),
        ));
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(out_of_range(
            "reservation_date",
            format!(
                "reservation_date - Invalid value for year: {year} - must be between {MIN_YEAR} and {MAX_YEAR}"
            ),
        ));
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        out_of_range(
            "reservation_date",
            format!("reservation_date - Invalid date: {text}"),
        )
    })
}

/// Parse `H:MM` or `H:MM:00`, optionally suffixed with `am`/`pm`
///
/// With a meridiem the hour must be 1–12, without it 0–23.
pub fn parse_time(text: &str) -> AppResult<NaiveTime> {
    let format_error = || {
        AppError::invalid_format(
            "reservation_time",
            format!("Invalid reservation_time: {text}"),
        )
    };

    let (clock, meridiem) = if let Some(rest) = text.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = text.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (text, None)
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let (hour, minute) = match parts.as_slice() {
        [hour, minute] => (*hour, *minute),
        [hour, minute, "00"] => (*hour, *minute),
        _ => return Err(format_error()),
    };
    if !is_digits(hour, 1, 2) || !is_digits(minute, 2, 2) {
        return Err(format_error());
    }
    let hour: u32 = hour.parse().map_err(|_| format_error())?;
    let minute: u32 = minute.parse().map_err(|_| format_error())?;

    let hour_range = if meridiem.is_some() { 1..=12 } else { 0..=23 };
    if !hour_range.contains(&hour) {
        return Err(out_of_range(
            "reservation_time",
            format!("reservation_time - Invalid value for hours: {hour}"),
        ));
    }
    if minute > 59 {
        return Err(out_of_range(
            "reservation_time",
            format!("reservation_time - Invalid value for minutes: {minute}"),
        ));
    }

    let hour24 = match meridiem {
        Some(true) if hour != 12 => hour + 12,
        Some(false) if hour == 12 => 0,
        _ => hour,
    };
    NaiveTime::from_hms_opt(hour24, minute, 0).ok_or_else(format_error)
}

/// Check a date string; an empty string means "not provided" and passes
pub fn validate_date(text: &str) -> AppResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    parse_date(text).map(|_| ())
}

/// Check a time string; an empty string means "not provided" and passes
pub fn validate_time(text: &str) -> AppResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    parse_time(text).map(|_| ())
}

/// The reservation must start after `now` and not on the closed weekday.
///
/// Both problems are reported together when both apply.
pub fn validate_future_and_open_day(
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> AppResult<()> {
    let instant = date.and_time(time);
    let mut reasons = Vec::new();

    if instant <= now {
        reasons.push("Reservation must be in the future.");
    }
    if instant.weekday() == CLOSED_WEEKDAY {
        reasons.push("Restaurant is closed on Tuesdays.");
    }

    if reasons.is_empty() {
        return Ok(());
    }
    Err(
        AppError::with_message(ErrorCode::ReservationDayUnavailable, reasons.join(" "))
            .with_detail("reasons", reasons),
    )
}

/// The reservation must start within `[10:30, 21:30)` on its day
pub fn validate_business_hours(date: NaiveDate, time: NaiveTime) -> AppResult<()> {
    let instant = date.and_time(time);
    let minute_of_day = instant.hour() * 60 + instant.minute();
    if (OPENING_MINUTE..LAST_SEATING_MINUTE).contains(&minute_of_day) {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::ReservationOutsideHours)
            .with_detail("reservation_time", time.format("%H:%M").to_string()))
    }
}

fn out_of_range(field: &str, msg: String) -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, msg).with_detail("field", field)
}
