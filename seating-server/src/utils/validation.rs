//! Input validation helpers
//!
//! Text length limits and the small field checks shared by the reservation
//! and table rules. SQLite TEXT has no built-in length enforcement.

use serde_json::Value;
use shared::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Guest names, table names
pub const MAX_NAME_LEN: usize = 200;

/// Phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Field helpers ───────────────────────────────────────────────────

/// A required text field: present, not blank, within `max_len` characters.
///
/// Returns the trimmed value.
pub fn required_text(value: Option<&str>, field: &str, max_len: usize) -> AppResult<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(AppError::required(field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(value.to_string())
}

/// A required whole JSON number of at least 1.
///
/// Strings are rejected even when they look numeric; `4.0` is accepted.
pub fn required_positive_int(value: Option<&Value>, field: &str) -> AppResult<i32> {
    let value = match value {
        None | Some(Value::Null) => return Err(AppError::required(field)),
        Some(v) => v,
    };

    let Value::Number(number) = value else {
        return Err(AppError::invalid_format(
            field,
            format!("{field} must be a number"),
        ));
    };

    let whole = match number.as_i64() {
        Some(n) => n,
        None => match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
            _ => {
                return Err(AppError::invalid_format(
                    field,
                    format!("{field} must be a whole number"),
                ));
            }
        },
    };

    if whole < 1 {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, format!("{field} must be at least 1"))
                .with_detail("field", field)
                .with_detail("value", whole),
        );
    }
    i32::try_from(whole).map_err(|_| {
        AppError::with_message(ErrorCode::ValueOutOfRange, format!("{field} is too large"))
            .with_detail("field", field)
    })
}

/// A required integer id (reservation_id in a seat request)
pub fn required_id(value: Option<&Value>, field: &str) -> AppResult<i64> {
    match value {
        None | Some(Value::Null) => Err(AppError::required(field)),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| AppError::invalid_format(field, format!("{field} must be an integer"))),
        Some(_) => Err(AppError::invalid_format(
            field,
            format!("{field} must be an integer"),
        )),
    }
}
