//! Admin endpoints under `/v1/admin`
//!
//! All handlers run behind the Admin role guard.

use super::ListResponse;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use breadvan_shared::{
    models::{
        area::Area, driver::Driver, item::CreateItem, item::Item, resident::Resident,
        street::Street,
    },
    services::{admin, resident::NewResident},
};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct NameRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct StreetFilter {
    pub area_id: Option<i64>,
}

pub async fn list_areas(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Area>>> {
    Ok(Json(admin::list_areas(&state.db).await?.into()))
}

pub async fn create_area(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> ApiResult<(StatusCode, Json<Area>)> {
    req.validate()?;
    let area = admin::add_area(&state.db, &req.name).await?;
    Ok((StatusCode::CREATED, Json(area)))
}

/// # Errors
///
/// - `404 Not Found`: unknown area
/// - `409 Conflict`: residents or drives still reference it
pub async fn delete_area(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    admin::delete_area(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_area_streets(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ListResponse<Street>>> {
    Ok(Json(admin::list_streets(&state.db, Some(id)).await?.into()))
}

pub async fn create_street(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NameRequest>,
) -> ApiResult<(StatusCode, Json<Street>)> {
    req.validate()?;
    let street = admin::add_street(&state.db, id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(street)))
}

pub async fn delete_street(
    State(state): State<AppState>,
    Path((area_id, street_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    admin::delete_street(&state.db, area_id, street_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /v1/admin/streets?area_id=1`
pub async fn list_streets(
    State(state): State<AppState>,
    Query(filter): Query<StreetFilter>,
) -> ApiResult<Json<ListResponse<Street>>> {
    Ok(Json(admin::list_streets(&state.db, filter.area_id).await?.into()))
}

pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Item>>> {
    Ok(Json(admin::list_items(&state.db).await?.into()))
}

/// ```text
/// POST /v1/admin/items
/// { "name": "Hops", "price": "1.50", "description": "Soft roll", "tags": ["bread"] }
/// ```
pub async fn create_item(
    State(state): State<AppState>,
    Json(req): Json<CreateItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = admin::add_item(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn delete_item(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    admin::delete_item(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_drivers(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Driver>>> {
    Ok(Json(admin::list_drivers(&state.db).await?.into()))
}

/// New drivers start `offline` with no location
pub async fn create_driver(
    State(state): State<AppState>,
    Json(req): Json<CreateDriverRequest>,
) -> ApiResult<(StatusCode, Json<Driver>)> {
    req.validate()?;
    let driver = admin::create_driver(&state.db, &req.username, &req.password).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

pub async fn delete_driver(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    admin::delete_driver(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_residents(
    State(state): State<AppState>,
) -> ApiResult<Json<ListResponse<Resident>>> {
    Ok(Json(admin::list_residents(&state.db).await?.into()))
}

pub async fn create_resident(
    State(state): State<AppState>,
    Json(req): Json<NewResident>,
) -> ApiResult<(StatusCode, Json<Resident>)> {
    let resident = admin::create_resident(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(resident)))
}
