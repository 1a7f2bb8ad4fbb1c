//! Reservation Repository

use super::RepoResult;
use crate::rules::ReservationDraft;
use shared::models::{Reservation, ReservationStatus};
use shared::util::{digits_only, now_millis};
use sqlx::SqliteExecutor;

pub async fn find_all<'e>(executor: impl SqliteExecutor<'e>) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT id AS reservation_id, first_name, last_name, mobile_number, reservation_date, reservation_time, people, status, created_at, updated_at FROM reservation ORDER BY reservation_date, reservation_time",
    )
    .fetch_all(executor)
    .await?;
    Ok(reservations)
}

pub async fn find_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        "SELECT id AS reservation_id, first_name, last_name, mobile_number, reservation_date, reservation_time, people, status, created_at, updated_at FROM reservation WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(reservation)
}

/// Active reservations for a day (everything except `finished`), earliest first
///
/// `date` must already be in canonical `YYYY-MM-DD` form.
pub async fn find_by_date<'e>(
    executor: impl SqliteExecutor<'e>,
    date: &str,
) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT id AS reservation_id, first_name, last_name, mobile_number, reservation_date, reservation_time, people, status, created_at, updated_at FROM reservation WHERE reservation_date = ? AND status <> 'finished' ORDER BY reservation_time",
    )
    .bind(date)
    .fetch_all(executor)
    .await?;
    Ok(reservations)
}

/// Reservations whose phone number contains `fragment`, comparing digits only
pub async fn search_by_mobile<'e>(
    executor: impl SqliteExecutor<'e>,
    fragment: &str,
) -> RepoResult<Vec<Reservation>> {
    let pattern = format!("%{}%", digits_only(fragment));
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT id AS reservation_id, first_name, last_name, mobile_number, reservation_date, reservation_time, people, status, created_at, updated_at FROM reservation WHERE mobile_digits LIKE ? ORDER BY reservation_date, reservation_time",
    )
    .bind(pattern)
    .fetch_all(executor)
    .await?;
    Ok(reservations)
}

/// Insert a validated reservation; status always starts as `booked`
pub async fn create<'e>(
    executor: impl SqliteExecutor<'e>,
    draft: &ReservationDraft,
) -> RepoResult<Reservation> {
    let now = now_millis();
    let reservation = sqlx::query_as::<_, Reservation>(
        "INSERT INTO reservation (first_name, last_name, mobile_number, mobile_digits, reservation_date, reservation_time, people, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) RETURNING id AS reservation_id, first_name, last_name, mobile_number, reservation_date, reservation_time, people, status, created_at, updated_at",
    )
    .bind(&draft.first_name)
    .bind(&draft.last_name)
    .bind(&draft.mobile_number)
    .bind(digits_only(&draft.mobile_number))
    .bind(draft.date_text())
    .bind(draft.time_text())
    .bind(draft.people)
    .bind(ReservationStatus::Booked)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(reservation)
}

/// Overwrite the editable fields; id and status are never touched here.
///
/// Returns `None` when the row is missing or already `finished`.
pub async fn update<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    draft: &ReservationDraft,
) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        "UPDATE reservation SET first_name = ?1, last_name = ?2, mobile_number = ?3, mobile_digits = ?4, reservation_date = ?5, reservation_time = ?6, people = ?7, updated_at = ?8 WHERE id = ?9 AND status <> 'finished' RETURNING id AS reservation_id, first_name, last_name, mobile_number, reservation_date, reservation_time, people, status, created_at, updated_at",
    )
    .bind(&draft.first_name)
    .bind(&draft.last_name)
    .bind(&draft.mobile_number)
    .bind(digits_only(&draft.mobile_number))
    .bind(draft.date_text())
    .bind(draft.time_text())
    .bind(draft.people)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(reservation)
}

/// Compare-and-set the status; returns `None` when the row is missing or its
/// status is no longer `from`
pub async fn transition_status<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    from: ReservationStatus,
    to: ReservationStatus,
) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        "UPDATE reservation SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4 RETURNING id AS reservation_id, first_name, last_name, mobile_number, reservation_date, reservation_time, people, status, created_at, updated_at",
    )
    .bind(to)
    .bind(now_millis())
    .bind(id)
    .bind(from)
    .fetch_optional(executor)
    .await?;
    Ok(reservation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    fn draft(phone: &str, day: u32, hour: u32) -> ReservationDraft {
        ReservationDraft {
            first_name: "Beth".into(),
            last_name: "Smith".into(),
            mobile_number: phone.into(),
            reservation_date: NaiveDate::from_ymd_opt(2030, 1, day).unwrap(),
            reservation_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            people: 2,
        }
    }

    #[tokio::test]
    async fn test_date_listing_and_mobile_search() {
        let dir = TempDir::new().unwrap();
        let db = DbService::new(dir.path().join("repo.db"), 2).await.unwrap();

        let late = create(&db.pool, &draft("555-0100", 9, 19)).await.unwrap();
        let early = create(&db.pool, &draft("(555) 010-0999", 9, 12)).await.unwrap();
        create(&db.pool, &draft("777-1234", 10, 12)).await.unwrap();
        assert_eq!(early.status, ReservationStatus::Booked);
        assert_eq!(early.reservation_date, "2030-01-09");
        assert_eq!(early.reservation_time, "12:00:00");

        let day = find_by_date(&db.pool, "2030-01-09").await.unwrap();
        let ids: Vec<i64> = day.iter().map(|r| r.reservation_id).collect();
        assert_eq!(ids, vec![early.reservation_id, late.reservation_id]);

        // punctuation in either side is ignored
        let found = search_by_mobile(&db.pool, "5550100").await.unwrap();
        assert_eq!(found.len(), 2);
        let found = search_by_mobile(&db.pool, "0100").await.unwrap();
        assert_eq!(found.len(), 2);
        let found = search_by_mobile(&db.pool, "777.12").await.unwrap();
        assert_eq!(found.len(), 1);

        transition_status(
            &db.pool,
            late.reservation_id,
            ReservationStatus::Booked,
            ReservationStatus::Cancelled,
        )
        .await
        .unwrap()
        .unwrap();
        // stale compare-and-set does nothing
        let stale = transition_status(
            &db.pool,
            late.reservation_id,
            ReservationStatus::Booked,
            ReservationStatus::Seated,
        )
        .await
        .unwrap();
        assert!(stale.is_none());

        assert!(update(&db.pool, 999, &draft("1", 9, 12)).await.unwrap().is_none());

        // a finished row is never rewritten
        transition_status(
            &db.pool,
            early.reservation_id,
            ReservationStatus::Booked,
            ReservationStatus::Seated,
        )
        .await
        .unwrap()
        .unwrap();
        transition_status(
            &db.pool,
            early.reservation_id,
            ReservationStatus::Seated,
            ReservationStatus::Finished,
        )
        .await
        .unwrap()
        .unwrap();
        let mut bigger = draft("555-0100", 9, 12);
        bigger.people = 9;
        assert!(update(&db.pool, early.reservation_id, &bigger).await.unwrap().is_none());
        let stored = find_by_id(&db.pool, early.reservation_id).await.unwrap().unwrap();
        assert_eq!(stored.people, 2);
        assert_eq!(stored.status, ReservationStatus::Finished);
    }
}
