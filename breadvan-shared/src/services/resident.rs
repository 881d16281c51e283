//! Resident operations: registration, stop requests and read-only views

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use super::{
    admin::{DRIVER_NOT_FOUND, INVALID_AREA, INVALID_STREET},
    messages, notify, unique_as_conflict, user::insert_user, ServiceError, ServiceResult,
};
use crate::models::{
    area::Area,
    drive::{DriveDetails, DriveStatus},
    driver::Driver,
    resident::Resident,
    stock::StockLine,
    stop::{Stop, StopStatus},
    street::Street,
    user::UserRole,
};

pub const RESIDENT_NOT_FOUND: &str = "Resident not found.";

/// Input for creating a resident account
#[derive(Debug, Clone, Deserialize)]
pub struct NewResident {
    pub username: String,
    pub password: String,
    pub area_id: i64,
    pub street_id: i64,
    pub house_number: i32,
}

/// A drive on the resident's street with the resident's own request, if any
#[derive(Debug, Clone, Serialize)]
pub struct StreetDrive {
    #[serde(flatten)]
    pub drive: DriveDetails,
    pub my_stop: Option<Stop>,
}

impl StreetDrive {
    pub fn stop_status(&self) -> Option<StopStatus> {
        self.my_stop.as_ref().map(|s| s.status)
    }
}

pub(crate) async fn require_resident(
    conn: &mut PgConnection,
    resident_id: i64,
) -> ServiceResult<Resident> {
    Resident::find_by_id(conn, resident_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(RESIDENT_NOT_FOUND))
}

/// Creates a resident account pinned to a street in an area
pub async fn create_resident(pool: &PgPool, data: NewResident) -> ServiceResult<Resident> {
    if data.house_number <= 0 {
        return Err(ServiceError::invalid("House number must be a positive number."));
    }

    let mut tx = pool.begin().await?;

    if Area::find_by_id(&mut *tx, data.area_id).await?.is_none() {
        return Err(ServiceError::not_found(INVALID_AREA));
    }
    if Street::find_in_area(&mut *tx, data.area_id, data.street_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::not_found(INVALID_STREET));
    }

    let user = insert_user(&mut tx, &data.username, &data.password, UserRole::Resident).await?;
    Resident::create_profile(
        &mut *tx,
        user.id,
        data.area_id,
        data.street_id,
        data.house_number,
    )
    .await?;
    let resident = require_resident(&mut tx, user.id).await?;
    tx.commit().await?;

    tracing::info!(
        resident_id = resident.id,
        username = %resident.username,
        street_id = resident.street_id,
        "Resident created"
    );
    Ok(resident)
}

/// Requests a stop on an upcoming drive
pub async fn request_stop(pool: &PgPool, resident_id: i64, drive_id: i64) -> ServiceResult<Stop> {
    let mut tx = pool.begin().await?;
    require_resident(&mut tx, resident_id).await?;

    let drive = DriveDetails::find_by_id(&mut *tx, drive_id)
        .await?
        .filter(|d| d.status == DriveStatus::Upcoming)
        .ok_or_else(|| ServiceError::invalid("Drive not available for requests."))?;

    const DUPLICATE: &str = "You already requested a stop for this drive.";
    if Stop::find_for_pair(&mut *tx, drive_id, resident_id)
        .await?
        .is_some()
    {
        return Err(ServiceError::conflict(DUPLICATE));
    }

    let stop = Stop::create(&mut *tx, drive_id, resident_id)
        .await
        .map_err(|e| unique_as_conflict(e, DUPLICATE))?;

    let message = messages::stop_requested(
        drive.id,
        &drive.street_name,
        &drive.area_name,
        drive.scheduled_time,
    );
    notify::notify(&mut tx, resident_id, &message).await?;
    tx.commit().await?;

    tracing::info!(resident_id, drive_id, stop_id = stop.id, "Stop requested");
    Ok(stop)
}

/// Withdraws a pending stop; both the driver and the resident are told
pub async fn cancel_stop(pool: &PgPool, resident_id: i64, drive_id: i64) -> ServiceResult<Stop> {
    let mut tx = pool.begin().await?;
    let resident = require_resident(&mut tx, resident_id).await?;

    let stop = Stop::find_for_pair(&mut *tx, drive_id, resident_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("No stop requested for this drive."))?;

    if stop.status != StopStatus::Pending {
        return Err(ServiceError::invalid(
            "Only pending stop requests can be cancelled.",
        ));
    }

    let drive = DriveDetails::find_by_id(&mut *tx, drive_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("No stop requested for this drive."))?;

    Stop::delete(&mut *tx, stop.id).await?;

    let to_driver = messages::stop_cancelled_for_driver(
        &resident.username,
        drive.id,
        &drive.street_name,
        &drive.area_name,
        drive.scheduled_time,
    );
    notify::notify(&mut tx, drive.driver_id, &to_driver).await?;

    let to_resident = messages::stop_cancelled_for_resident(
        drive.id,
        &drive.street_name,
        &drive.area_name,
        drive.scheduled_time,
    );
    notify::notify(&mut tx, resident_id, &to_resident).await?;
    tx.commit().await?;

    tracing::info!(resident_id, drive_id, stop_id = stop.id, "Stop cancelled");
    Ok(stop)
}

/// Public profile of a driver: status and current location
pub async fn view_driver_stats(pool: &PgPool, driver_id: i64) -> ServiceResult<Driver> {
    Driver::find_by_id(pool, driver_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(DRIVER_NOT_FOUND))
}

/// What a driver is carrying
pub async fn view_stock(pool: &PgPool, driver_id: i64) -> ServiceResult<Vec<StockLine>> {
    let mut conn = pool.acquire().await?;
    if Driver::find_by_id(&mut *conn, driver_id).await?.is_none() {
        return Err(ServiceError::not_found(DRIVER_NOT_FOUND));
    }
    Ok(StockLine::list_for_driver(&mut *conn, driver_id).await?)
}

/// Upcoming and in-progress drives on the resident's street
pub async fn street_drives(pool: &PgPool, resident_id: i64) -> ServiceResult<Vec<StreetDrive>> {
    let mut conn = pool.acquire().await?;
    let resident = require_resident(&mut conn, resident_id).await?;

    let drives = DriveDetails::list_active_for_street(&mut *conn, resident.street_id).await?;
    let mut result = Vec::with_capacity(drives.len());
    for drive in drives {
        let my_stop = Stop::find_for_pair(&mut *conn, drive.id, resident_id).await?;
        result.push(StreetDrive { drive, my_stop });
    }
    Ok(result)
}

