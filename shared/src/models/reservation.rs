//! Reservation Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reservation lifecycle status
///
/// `booked` is the initial state; `finished` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ReservationStatus {
    #[default]
    Booked,
    Seated,
    Finished,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Booked,
        ReservationStatus::Seated,
        ReservationStatus::Finished,
        ReservationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Seated => "seated",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal states have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the four known values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {} is invalid", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for ReservationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Reservation entity (预约)
///
/// `reservation_date` is stored as `YYYY-MM-DD` and `reservation_time` as
/// `HH:MM:SS` (24h), whatever form the booking request used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub reservation_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub reservation_date: String,
    pub reservation_time: String,
    pub people: i32,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/update reservation payload, as sent by clients
///
/// Fields stay loosely typed so validation can report exactly which one is
/// missing or malformed instead of failing deserialization as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationPayload {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub reservation_date: Option<String>,
    #[serde(default)]
    pub reservation_time: Option<String>,
    #[serde(default)]
    pub people: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Status update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("booked".parse(), Ok(ReservationStatus::Booked));
        assert_eq!("cancelled".parse(), Ok(ReservationStatus::Cancelled));
        assert_eq!(
            "Seated".parse::<ReservationStatus>(),
            Err(UnknownStatus("Seated".into()))
        );
        assert!("done".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&ReservationStatus::Finished).unwrap();
        assert_eq!(json, "\"finished\"");
        let status: ReservationStatus = serde_json::from_str("\"seated\"").unwrap();
        assert_eq!(status, ReservationStatus::Seated);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ReservationStatus::Booked.is_terminal());
        assert!(!ReservationStatus::Seated.is_terminal());
        assert!(ReservationStatus::Finished.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_payload_null_status_is_none() {
        let payload: ReservationPayload =
            serde_json::from_str(r#"{"first_name":"Ann","status":null}"#).unwrap();
        assert_eq!(payload.first_name.as_deref(), Some("Ann"));
        assert!(payload.status.is_none());
        assert!(payload.people.is_none());
    }
}
