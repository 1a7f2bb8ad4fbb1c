//! Dining Table API Handlers

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{DiningTable, DiningTableCreate, SeatRequest, Seating};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::{Envelope, body_data, created, ok, parse_id, query_params};
use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::rules::validate_table;
use crate::utils::validation::required_id;

#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    /// `true` 时只返回空闲桌台
    #[serde(default)]
    pub available: Option<bool>,
    pub table_name: Option<String>,
}

/// GET /tables - 获取桌台列表 (按名称排序)
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    let query = query_params(query)?;
    if let Some(name) = query.table_name.filter(|n| !n.is_empty()) {
        let found = dining_table::find_by_name(&state.db.pool, &name).await?;
        if found.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::TableNotFound,
                format!("No table found with name {name}."),
            ));
        }
        return Ok(ok(found));
    }

    let tables = if query.available == Some(true) {
        dining_table::find_available(&state.db.pool).await?
    } else {
        dining_table::find_all(&state.db.pool).await?
    };
    Ok(ok(tables))
}

/// POST /tables - 创建桌台 (初始为空闲)
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Envelope<DiningTableCreate>>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<DiningTable>>)> {
    let payload = body_data(payload)?;
    let draft = validate_table(&payload)?;

    let table = dining_table::create(&state.db.pool, &draft).await?;
    tracing::info!(
        table_id = table.table_id,
        table_name = %table.table_name,
        capacity = table.capacity,
        "Table created"
    );
    Ok(created(table))
}

/// GET /tables/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let id = parse_id(&id, || table_not_found(&id))?;
    let table = dining_table::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| table_not_found(&id.to_string()))?;
    Ok(ok(table))
}

/// PUT /tables/{id}/seat - 入座
pub async fn seat(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<Envelope<SeatRequest>>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Seating>>> {
    let table_id = parse_id(&id, || table_not_found(&id))?;
    let body = body_data(payload)?;
    let reservation_id = required_id(body.reservation_id.as_ref(), "reservation_id")?;

    let seating = state.seating.seat(table_id, reservation_id).await?;
    Ok(ok(seating))
}

/// DELETE /tables/{id}/seat - 清台 (预约变为 finished)
pub async fn clear(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Seating>>> {
    let table_id = parse_id(&id, || table_not_found(&id))?;
    let seating = state.seating.clear(table_id).await?;
    Ok(ok(seating))
}

fn table_not_found(raw: &str) -> AppError {
    AppError::with_message(ErrorCode::TableNotFound, format!("table_id {raw} not found."))
}
