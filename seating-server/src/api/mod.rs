//! HTTP API
//!
//! Request bodies use a `{ "data": { ... } }` envelope; responses use
//! [`ApiResponse`].

pub mod health;
pub mod reservations;
pub mod tables;

use axum::error_handling::HandleErrorLayer;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{Method, StatusCode, Uri};
use axum::{Json, Router, middleware as axum_middleware};
use http::{HeaderName, HeaderValue};
use serde::Deserialize;
use shared::{ApiResponse, AppError, AppResult, ErrorCode};
use std::time::Duration;
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::middleware;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
///
/// Unknown paths and known paths with the wrong method both answer 405.
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(reservations::router())
        .merge(tables::router())
        .merge(health::router())
        .fallback(not_allowed)
        .method_not_allowed_fallback(not_allowed)
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_router()
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(timeout)),
        )
        // CORS - 看板前端跨域访问
        .layer(CorsLayer::permissive())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // outermost, so the id exists before logging and propagation
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}

async fn not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::method_not_allowed(method.as_str(), uri.path())
}

/// Errors from the timeout layer become standard error bodies
pub async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::with_message(ErrorCode::TimeoutError, "Request timed out")
    } else {
        AppError::internal(format!("Unhandled middleware error: {err}"))
    }
}

/// Unwrap query parameters, turning parse failures into 400s
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    let Query(params) = query.map_err(|rejection| {
        AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text())
    })?;
    Ok(params)
}

/// `{ "data": ... }` request envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
}

/// Unwrap the request envelope, turning malformed JSON and a missing
/// `data` property into 400s.
pub fn body_data<T>(payload: Result<Json<Envelope<T>>, JsonRejection>) -> AppResult<T> {
    let Json(envelope) = payload.map_err(|rejection| {
        AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text())
    })?;
    envelope.data.ok_or_else(|| {
        AppError::with_message(ErrorCode::InvalidRequest, "Body must have data property")
    })
}

/// Path ids that are not integers cannot name a row
pub fn parse_id(raw: &str, not_found: impl FnOnce() -> AppError) -> AppResult<i64> {
    raw.parse::<i64>().map_err(|_| not_found())
}

/// 200 with the standard envelope
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 201 with the standard envelope
pub fn created<T>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}
