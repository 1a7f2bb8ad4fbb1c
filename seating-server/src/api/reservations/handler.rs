//! Reservation API Handlers

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::Deserialize;
use shared::models::{Reservation, ReservationPayload, ReservationStatus, StatusUpdate};
use shared::util::digits_only;
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::{Envelope, body_data, created, ok, parse_id, query_params};
use crate::db::repository::RepoError;
use crate::core::ServerState;
use crate::db::repository::reservation;
use crate::rules::temporal::parse_date;
use crate::rules::{ValidationMode, validate_reservation};
use crate::seating::coordinator::reservation_not_found;

#[derive(Debug, Default, Deserialize)]
pub struct ReservationQuery {
    pub date: Option<String>,
    pub mobile_number: Option<String>,
}

fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// GET /reservations - 按日期或手机号查询，无参数时返回全部
///
/// `date` wins when both are given.
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ReservationQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<Reservation>>>> {
    let query = query_params(query)?;
    let date = query.date.filter(|d| !d.is_empty());
    let mobile = query.mobile_number.filter(|m| !m.is_empty());

    if let Some(date) = date {
        let day = parse_date(&date)?;
        let found = reservation::find_by_date(&state.db.pool, &day.format("%Y-%m-%d").to_string())
            .await?;
        if found.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::ReservationNotFound,
                format!("No reservations found for date {date}."),
            ));
        }
        return Ok(ok(found));
    }

    if let Some(mobile) = mobile {
        if digits_only(&mobile).is_empty() {
            return Err(AppError::validation("mobile_number must contain at least one digit")
                .with_detail("field", "mobile_number"));
        }
        let found = reservation::search_by_mobile(&state.db.pool, &mobile).await?;
        if found.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::ReservationNotFound,
                format!("No reservations found for mobile number {mobile}."),
            ));
        }
        return Ok(ok(found));
    }

    Ok(ok(reservation::find_all(&state.db.pool).await?))
}

/// POST /reservations - 创建预约 (状态固定为 booked)
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Envelope<ReservationPayload>>, JsonRejection>,
) -> AppResult<(axum::http::StatusCode, Json<ApiResponse<Reservation>>)> {
    let payload = body_data(payload)?;
    let draft = validate_reservation(&payload, ValidationMode::Create, local_now())?;

    let created_row = reservation::create(&state.db.pool, &draft).await?;
    tracing::info!(
        reservation_id = created_row.reservation_id,
        date = %created_row.reservation_date,
        people = created_row.people,
        "Reservation created"
    );
    Ok(created(created_row))
}

/// GET /reservations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let id = parse_id(&id, || not_found_raw(&id))?;
    let found = reservation::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| reservation_not_found(id))?;
    Ok(ok(found))
}

/// PUT /reservations/{id} - 修改预约信息 (不改变状态)
///
/// 读取、校验和写入在同一个写事务内，清台不会在中间插入
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<Envelope<ReservationPayload>>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let id = parse_id(&id, || not_found_raw(&id))?;
    let mut tx = state.db.begin_write().await.map_err(RepoError::from)?;

    let existing = reservation::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| reservation_not_found(id))?;
    if existing.status == ReservationStatus::Finished {
        return Err(finished(id));
    }

    let payload = body_data(payload)?;
    let draft = validate_reservation(&payload, ValidationMode::Update, local_now())?;

    let updated = reservation::update(&mut *tx, id, &draft)
        .await?
        .ok_or_else(|| finished(id))?;
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(reservation_id = id, "Reservation updated");
    Ok(ok(updated))
}

/// PUT /reservations/{id}/status - 状态流转 (取消 / 完成)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<Envelope<StatusUpdate>>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let id = parse_id(&id, || not_found_raw(&id))?;
    // 先确认预约存在，再检查请求体
    reservation::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| reservation_not_found(id))?;
    let body = body_data(payload)?;
    let updated = state
        .seating
        .update_status(id, body.status.as_deref())
        .await?;
    Ok(ok(updated))
}

fn finished(id: i64) -> AppError {
    AppError::new(ErrorCode::ReservationFinished).with_detail("reservation_id", id)
}

fn not_found_raw(raw: &str) -> AppError {
    AppError::with_message(
        ErrorCode::ReservationNotFound,
        format!("reservation_id {raw} not found."),
    )
}
