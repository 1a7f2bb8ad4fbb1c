//! Dining table payload validation

use crate::utils::validation::{MAX_NAME_LEN, required_text};
use serde_json::Value;
use shared::models::DiningTableCreate;
use shared::{AppError, AppResult, ErrorCode};

pub const MIN_TABLE_NAME_LEN: usize = 2;

/// A validated new table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDraft {
    pub table_name: String,
    pub capacity: i32,
}

pub fn validate_table(payload: &DiningTableCreate) -> AppResult<TableDraft> {
    let table_name = required_text(payload.table_name.as_deref(), "table_name", MAX_NAME_LEN)?;
    if table_name.chars().count() < MIN_TABLE_NAME_LEN {
        return Err(AppError::validation(format!(
            "table_name must be at least {MIN_TABLE_NAME_LEN} characters"
        ))
        .with_detail("field", "table_name"));
    }

    let capacity = match payload.capacity.as_ref() {
        None | Some(Value::Null) => return Err(AppError::required("capacity")),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
            AppError::invalid_format("capacity", "capacity must be a whole number")
        })?,
        Some(_) => {
            return Err(AppError::invalid_format("capacity", "capacity must be a number"));
        }
    };
    if capacity < 1 {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, "capacity must be at least 1")
                .with_detail("field", "capacity")
                .with_detail("value", capacity),
        );
    }
    let capacity = i32::try_from(capacity).map_err(|_| {
        AppError::with_message(ErrorCode::ValueOutOfRange, "capacity is too large")
            .with_detail("field", "capacity")
    })?;

    Ok(TableDraft {
        table_name,
        capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(name: Option<&str>, capacity: Option<Value>) -> DiningTableCreate {
        DiningTableCreate {
            table_name: name.map(str::to_string),
            capacity,
        }
    }

    #[test]
    fn test_valid_table() {
        let draft = validate_table(&payload(Some("Bar #1"), Some(json!(6)))).unwrap();
        assert_eq!(draft.table_name, "Bar #1");
        assert_eq!(draft.capacity, 6);
    }

    #[test]
    fn test_name_rules() {
        let err = validate_table(&payload(None, Some(json!(2)))).unwrap_err();
        assert_eq!(err.message, "table_name is required");

        let err = validate_table(&payload(Some("A"), Some(json!(2)))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("at least 2"));
    }

    #[test]
    fn test_capacity_rules() {
        let err = validate_table(&payload(Some("#1"), None)).unwrap_err();
        assert_eq!(err.message, "capacity is required");

        let err = validate_table(&payload(Some("#1"), Some(json!("4")))).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        let err = validate_table(&payload(Some("#1"), Some(json!(0)))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
