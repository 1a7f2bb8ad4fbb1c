//! Dining Table Repository

use super::RepoResult;
use crate::rules::TableDraft;
use shared::models::DiningTable;
use shared::util::now_millis;
use sqlx::SqliteExecutor;

/// All tables, ordered by name
pub async fn find_all<'e>(executor: impl SqliteExecutor<'e>) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id AS table_id, table_name, capacity, reservation_id, created_at FROM dining_table ORDER BY table_name",
    )
    .fetch_all(executor)
    .await?;
    Ok(tables)
}

/// Tables with no occupying reservation, ordered by name
pub async fn find_available<'e>(
    executor: impl SqliteExecutor<'e>,
) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id AS table_id, table_name, capacity, reservation_id, created_at FROM dining_table WHERE reservation_id IS NULL ORDER BY table_name",
    )
    .fetch_all(executor)
    .await?;
    Ok(tables)
}

pub async fn find_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id AS table_id, table_name, capacity, reservation_id, created_at FROM dining_table WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(table)
}

/// Names are unique by convention only, so a lookup may return several rows
pub async fn find_by_name<'e>(
    executor: impl SqliteExecutor<'e>,
    name: &str,
) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id AS table_id, table_name, capacity, reservation_id, created_at FROM dining_table WHERE table_name = ? ORDER BY id",
    )
    .bind(name)
    .fetch_all(executor)
    .await?;
    Ok(tables)
}

/// The table currently occupied by a reservation, if any
pub async fn find_by_reservation<'e>(
    executor: impl SqliteExecutor<'e>,
    reservation_id: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id AS table_id, table_name, capacity, reservation_id, created_at FROM dining_table WHERE reservation_id = ?",
    )
    .bind(reservation_id)
    .fetch_optional(executor)
    .await?;
    Ok(table)
}

/// Insert a validated table; new tables are always free
pub async fn create<'e>(
    executor: impl SqliteExecutor<'e>,
    draft: &TableDraft,
) -> RepoResult<DiningTable> {
    let table = sqlx::query_as::<_, DiningTable>(
        "INSERT INTO dining_table (table_name, capacity, reservation_id, created_at) VALUES (?, ?, NULL, ?) RETURNING id AS table_id, table_name, capacity, reservation_id, created_at",
    )
    .bind(&draft.table_name)
    .bind(draft.capacity)
    .bind(now_millis())
    .fetch_one(executor)
    .await?;
    Ok(table)
}

/// Point a free table at a reservation; `None` if the table is missing or
/// already occupied
pub async fn occupy<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    reservation_id: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "UPDATE dining_table SET reservation_id = ? WHERE id = ? AND reservation_id IS NULL RETURNING id AS table_id, table_name, capacity, reservation_id, created_at",
    )
    .bind(reservation_id)
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(table)
}

/// Free a table held by `reservation_id`; `None` if it holds something else
pub async fn release<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    reservation_id: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "UPDATE dining_table SET reservation_id = NULL WHERE id = ? AND reservation_id = ? RETURNING id AS table_id, table_name, capacity, reservation_id, created_at",
    )
    .bind(id)
    .bind(reservation_id)
    .fetch_optional(executor)
    .await?;
    Ok(table)
}
