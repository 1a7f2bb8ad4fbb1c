//! Reservation status transitions
//!
//! ```text
//! booked ──seat──▶ seated ──clear/finish──▶ finished
//!    │                │
//!    └────cancel──────┴──────────────────▶ cancelled
//! ```
//!
//! `finished` and `cancelled` are terminal. Nothing ever returns to
//! `booked`.

use shared::models::ReservationStatus;
use shared::{AppError, AppResult, ErrorCode};

/// Statuses reachable from `from` in one step
pub fn allowed_targets(from: ReservationStatus) -> &'static [ReservationStatus] {
    use ReservationStatus::*;
    match from {
        Booked => &[Seated, Cancelled],
        Seated => &[Finished, Cancelled],
        Finished | Cancelled => &[],
    }
}

pub fn can_transition(from: ReservationStatus, to: ReservationStatus) -> bool {
    allowed_targets(from).contains(&to)
}

/// Reject any transition not in the graph.
///
/// A finished reservation gets its own error so clients can tell "done"
/// apart from "wrong order".
pub fn check_transition(from: ReservationStatus, to: ReservationStatus) -> AppResult<()> {
    if from.is_terminal() {
        return Err(match from {
            ReservationStatus::Finished => finished_error(from, to),
            _ => invalid_transition(from, to),
        });
    }
    if can_transition(from, to) {
        return Ok(());
    }
    Err(invalid_transition(from, to))
}

/// Parse a requested status; missing or unknown values are rejected here
/// so nothing downstream sees them.
pub fn parse_requested(raw: Option<&str>) -> AppResult<ReservationStatus> {
    let raw = raw.ok_or_else(|| AppError::required("status"))?;
    raw.parse::<ReservationStatus>().map_err(|e| {
        AppError::with_message(ErrorCode::InvalidStatus, e.to_string()).with_detail("status", raw)
    })
}

pub fn invalid_transition(from: ReservationStatus, to: ReservationStatus) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!("invalid transition from {from} to {to}"),
    )
    .with_detail("current", from.as_str())
    .with_detail("requested", to.as_str())
}

fn finished_error(from: ReservationStatus, to: ReservationStatus) -> AppError {
    AppError::new(ErrorCode::ReservationFinished)
        .with_detail("current", from.as_str())
        .with_detail("requested", to.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_transition_graph() {
        let allowed = [
            (Booked, Seated),
            (Booked, Cancelled),
            (Seated, Finished),
            (Seated, Cancelled),
        ];
        for from in ReservationStatus::ALL {
            for to in ReservationStatus::ALL {
                assert_eq!(
                    can_transition(from, to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_nothing_returns_to_booked() {
        for from in ReservationStatus::ALL {
            assert!(check_transition(from, Booked).is_err());
        }
    }

    #[test]
    fn test_finished_is_reported_distinctly() {
        let err = check_transition(Finished, Cancelled).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationFinished);
        assert_eq!(err.message, "a finished reservation cannot be updated");

        let err = check_transition(Cancelled, Seated).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(err.message, "invalid transition from cancelled to seated");
        let details = err.details.unwrap();
        assert_eq!(details["current"], "cancelled");
        assert_eq!(details["requested"], "seated");
    }

    #[test]
    fn test_terminal_states_have_no_way_out() {
        for from in ReservationStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            assert!(allowed_targets(from).is_empty());
            for to in ReservationStatus::ALL {
                assert!(check_transition(from, to).is_err(), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_parse_requested() {
        assert_eq!(parse_requested(Some("finished")).unwrap(), Finished);
        assert_eq!(
            parse_requested(None).unwrap_err().code,
            ErrorCode::RequiredField
        );
        let err = parse_requested(Some("unknown")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatus);
        assert_eq!(err.message, "status unknown is invalid");
    }
}
