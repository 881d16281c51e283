//! Driver endpoints under `/v1/driver`
//!
//! The caller's own id is the driver id; ownership of drives and stops is
//! enforced by the services, which answer 404/403 for someone else's.

use super::ListResponse;
use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use breadvan_shared::{
    auth::middleware::AuthContext,
    models::{
        drive::{Drive, DriveDetails},
        stock::{DriverStock, StockLine},
        stop::{Stop, StopDetails},
    },
    services::{driver, notify},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// ```text
/// POST /v1/driver/drives
/// { "area_id": 1, "street_id": 2, "date": "2026-10-20", "time": "10:00" }
/// ```
#[derive(Debug, Deserialize)]
pub struct ScheduleDriveRequest {
    pub area_id: i64,
    pub street_id: i64,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ApproveRequest {
    #[validate(length(max = 20, message = "ETA must be at most 20 characters."))]
    pub eta: Option<String>,
    #[validate(length(max = 120, message = "Status message must be at most 120 characters."))]
    pub status_message: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(max = 120, message = "Reason must be at most 120 characters."))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRequest {
    pub resident_id: i64,
    pub drive_id: i64,
    #[validate(length(max = 20, message = "ETA must be at most 20 characters."))]
    pub eta: Option<String>,
    #[validate(length(max = 120, message = "Status message must be at most 120 characters."))]
    pub status_message: Option<String>,
}

/// Either an existing catalog item by id, or an item by name
///
/// Naming an unknown item adds it to the catalog at `price` (or 0).
#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub item_id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: i32,
}

pub async fn list_drives(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListResponse<DriveDetails>>> {
    Ok(Json(driver::view_drives(&state.db, auth.user_id).await?.into()))
}

/// Schedules a drive and notifies every resident of the street
///
/// # Errors
///
/// - `400 Bad Request`: bad date/time format, in the past, beyond 60 days
/// - `404 Not Found`: unknown area, or the street is not in the area
pub async fn schedule_drive(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ScheduleDriveRequest>,
) -> ApiResult<(StatusCode, Json<DriveDetails>)> {
    let drive = driver::schedule_drive(
        &state.db,
        auth.user_id,
        req.area_id,
        req.street_id,
        &req.date,
        &req.time,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(drive)))
}

pub async fn start_drive(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Drive>> {
    Ok(Json(driver::start_drive(&state.db, auth.user_id, id).await?))
}

/// Completes whichever drive is in progress
pub async fn end_drive(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Drive>> {
    Ok(Json(driver::end_drive(&state.db, auth.user_id).await?))
}

pub async fn cancel_drive(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Drive>> {
    Ok(Json(driver::cancel_drive(&state.db, auth.user_id, id).await?))
}

pub async fn drive_stops(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ListResponse<StopDetails>>> {
    Ok(Json(
        driver::view_requested_stops(&state.db, auth.user_id, id)
            .await?
            .into(),
    ))
}

pub async fn approve_stop(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<ApproveRequest>,
) -> ApiResult<Json<Stop>> {
    req.validate()?;
    let stop = driver::approve_stop(
        &state.db,
        auth.user_id,
        id,
        req.eta.as_deref(),
        req.status_message.as_deref(),
    )
    .await?;
    Ok(Json(stop))
}

pub async fn reject_stop(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<RejectRequest>,
) -> ApiResult<Json<Stop>> {
    req.validate()?;
    let stop = driver::reject_stop(&state.db, auth.user_id, id, req.reason.as_deref()).await?;
    Ok(Json(stop))
}

/// Sends an ETA/status update to a resident with a stop on the drive
pub async fn send_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateRequest>,
) -> ApiResult<Json<Stop>> {
    req.validate()?;
    let stop = driver::send_stop_update(
        &state.db,
        auth.user_id,
        req.resident_id,
        req.drive_id,
        req.eta.as_deref(),
        req.status_message.as_deref(),
    )
    .await?;
    Ok(Json(stop))
}

pub async fn view_stock(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListResponse<StockLine>>> {
    Ok(Json(driver::view_stock(&state.db, auth.user_id).await?.into()))
}

/// `PUT /v1/driver/stock` with `item_id` or `name`
pub async fn set_stock(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<StockRequest>,
) -> ApiResult<Json<DriverStock>> {
    let stock = match (req.item_id, req.name.as_deref()) {
        (Some(item_id), _) => {
            driver::update_stock(&state.db, auth.user_id, item_id, req.quantity).await?
        }
        (None, Some(name)) => {
            driver::add_stock_by_name(&state.db, auth.user_id, name, req.price, req.quantity)
                .await?
        }
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Either item_id or name is required".to_string(),
            ))
        }
    };
    Ok(Json(stock))
}

pub async fn remove_stock(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    driver::remove_stock(&state.db, auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn inbox(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListResponse<String>>> {
    Ok(Json(notify::inbox(&state.db, auth.user_id).await?.into()))
}
