//! Resident endpoints under `/v1/resident`

use super::ListResponse;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use breadvan_shared::{
    auth::middleware::AuthContext,
    models::{driver::Driver, stock::StockLine, stop::Stop},
    services::{
        notify,
        resident::{self, StreetDrive},
    },
};

/// Upcoming and in-progress drives on the resident's street
pub async fn street_drives(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListResponse<StreetDrive>>> {
    Ok(Json(resident::street_drives(&state.db, auth.user_id).await?.into()))
}

/// # Errors
///
/// - `400 Bad Request`: drive missing or no longer upcoming
/// - `409 Conflict`: a stop was already requested
pub async fn request_stop(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(drive_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Stop>)> {
    let stop = resident::request_stop(&state.db, auth.user_id, drive_id).await?;
    Ok((StatusCode::CREATED, Json(stop)))
}

pub async fn cancel_stop(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(drive_id): Path<i64>,
) -> ApiResult<Json<Stop>> {
    Ok(Json(resident::cancel_stop(&state.db, auth.user_id, drive_id).await?))
}

pub async fn inbox(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListResponse<String>>> {
    Ok(Json(notify::inbox(&state.db, auth.user_id).await?.into()))
}

pub async fn driver_stats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Driver>> {
    Ok(Json(resident::view_driver_stats(&state.db, id).await?))
}

pub async fn driver_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ListResponse<StockLine>>> {
    Ok(Json(resident::view_stock(&state.db, id).await?.into()))
}
