//! Driver operations: drives, stop decisions, updates and stock
//!
//! Drive state changes go through [`Drive::transition`], which only matches
//! a row still in the expected state, so two racing requests cannot both
//! start or cancel the same drive.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use super::{
    admin::{DRIVER_NOT_FOUND, INVALID_AREA, INVALID_ITEM, INVALID_STREET},
    check_length, messages, non_blank, notify, unique_as_conflict, ServiceError, ServiceResult,
    MAX_ETA_LEN, MAX_NAME_LEN, MAX_STATUS_LEN,
};
use crate::models::{
    area::Area,
    drive::{CreateDrive, Drive, DriveDetails, DriveStatus},
    driver::{Driver, DriverStatus},
    item::{CreateItem, Item},
    resident::Resident,
    stock::{DriverStock, StockLine},
    stop::{Stop, StopDetails, StopStatus},
    street::Street,
};
use crate::schedule;

pub const DRIVE_NOT_FOUND: &str = "Drive not found.";
pub const STOP_NOT_FOUND: &str = "Stop not found.";
pub const UNAUTHORIZED_STOP: &str = "Unauthorized for this stop.";

pub(crate) async fn require_driver(conn: &mut PgConnection, driver_id: i64) -> ServiceResult<Driver> {
    Driver::find_by_id(conn, driver_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(DRIVER_NOT_FOUND))
}

/// Loads a drive only if `driver_id` owns it
async fn owned_drive(conn: &mut PgConnection, driver_id: i64, drive_id: i64) -> ServiceResult<Drive> {
    match Drive::find_by_id(conn, drive_id).await? {
        Some(drive) if drive.driver_id == driver_id => Ok(drive),
        _ => Err(ServiceError::not_found(DRIVE_NOT_FOUND)),
    }
}

/// Schedules a drive, measured against the local clock
pub async fn schedule_drive(
    pool: &PgPool,
    driver_id: i64,
    area_id: i64,
    street_id: i64,
    date: &str,
    time: &str,
) -> ServiceResult<DriveDetails> {
    schedule_drive_at(pool, driver_id, area_id, street_id, date, time, schedule::local_now()).await
}

/// Schedules a drive relative to `now` and notifies the street's residents
pub async fn schedule_drive_at(
    pool: &PgPool,
    driver_id: i64,
    area_id: i64,
    street_id: i64,
    date: &str,
    time: &str,
    now: NaiveDateTime,
) -> ServiceResult<DriveDetails> {
    let (scheduled_date, scheduled_time) = schedule::parse_and_validate(date, time, now)?;

    let mut tx = pool.begin().await?;
    let driver = require_driver(&mut tx, driver_id).await?;

    if Area::find_by_id(&mut *tx, area_id).await?.is_none() {
        return Err(ServiceError::not_found(INVALID_AREA));
    }
    if Street::find_in_area(&mut *tx, area_id, street_id).await?.is_none() {
        return Err(ServiceError::not_found(INVALID_STREET));
    }

    let drive = Drive::create(
        &mut *tx,
        CreateDrive {
            driver_id,
            area_id,
            street_id,
            scheduled_date,
            scheduled_time,
        },
    )
    .await?;

    let message = messages::drive_scheduled(drive.id, &driver.username, scheduled_date, scheduled_time);
    notify::notify_street(&mut tx, street_id, &message).await?;

    let details = DriveDetails::find_by_id(&mut *tx, drive.id)
        .await?
        .ok_or_else(|| ServiceError::not_found(DRIVE_NOT_FOUND))?;
    tx.commit().await?;

    tracing::info!(
        driver_id,
        drive_id = details.id,
        street_id,
        date = %scheduled_date,
        "Drive scheduled"
    );
    Ok(details)
}

/// Starts an upcoming drive; the driver becomes `Busy` and moves to its street
pub async fn start_drive(pool: &PgPool, driver_id: i64, drive_id: i64) -> ServiceResult<Drive> {
    let mut tx = pool.begin().await?;
    require_driver(&mut tx, driver_id).await?;

    if let Some(current) = Drive::find_in_progress_for_driver(&mut *tx, driver_id).await? {
        return Err(ServiceError::invalid(format!(
            "You are already on drive {}.",
            current.id
        )));
    }

    let drive = Drive::transition(
        &mut *tx,
        drive_id,
        driver_id,
        DriveStatus::Upcoming,
        DriveStatus::InProgress,
    )
    .await
    .map_err(|e| unique_as_conflict(e, "You are already on another drive."))?
    .ok_or_else(|| ServiceError::invalid("Drive not found or cannot be started."))?;

    Driver::set_status(&mut *tx, driver_id, DriverStatus::Busy).await?;
    Driver::set_location(&mut *tx, driver_id, drive.area_id, drive.street_id).await?;
    tx.commit().await?;

    tracing::info!(driver_id, drive_id, "Drive started");
    Ok(drive)
}

/// Completes the driver's in-progress drive; the driver becomes `Available`
pub async fn end_drive(pool: &PgPool, driver_id: i64) -> ServiceResult<Drive> {
    let mut tx = pool.begin().await?;
    require_driver(&mut tx, driver_id).await?;

    let current = Drive::find_in_progress_for_driver(&mut *tx, driver_id)
        .await?
        .ok_or_else(|| ServiceError::invalid("No drive in progress."))?;

    let drive = Drive::transition(
        &mut *tx,
        current.id,
        driver_id,
        DriveStatus::InProgress,
        DriveStatus::Completed,
    )
    .await?
    .ok_or_else(|| ServiceError::invalid("No drive in progress."))?;

    Driver::set_status(&mut *tx, driver_id, DriverStatus::Available).await?;
    tx.commit().await?;

    tracing::info!(driver_id, drive_id = drive.id, "Drive completed");
    Ok(drive)
}

/// Cancels an upcoming drive and tells the target street
pub async fn cancel_drive(pool: &PgPool, driver_id: i64, drive_id: i64) -> ServiceResult<Drive> {
    let mut tx = pool.begin().await?;
    let driver = require_driver(&mut tx, driver_id).await?;
    let existing = owned_drive(&mut tx, driver_id, drive_id).await?;

    if existing.status != DriveStatus::Upcoming {
        return Err(ServiceError::invalid("Only upcoming drives can be cancelled."));
    }

    let drive = Drive::transition(
        &mut *tx,
        drive_id,
        driver_id,
        DriveStatus::Upcoming,
        DriveStatus::Cancelled,
    )
    .await?
    .ok_or_else(|| ServiceError::invalid("Only upcoming drives can be cancelled."))?;

    let message = messages::drive_cancelled(
        drive.id,
        &driver.username,
        drive.scheduled_date,
        drive.scheduled_time,
    );
    notify::notify_street(&mut tx, drive.street_id, &message).await?;
    tx.commit().await?;

    tracing::info!(driver_id, drive_id, "Drive cancelled");
    Ok(drive)
}

/// The driver's upcoming and in-progress drives, soonest first
pub async fn view_drives(pool: &PgPool, driver_id: i64) -> ServiceResult<Vec<DriveDetails>> {
    Ok(DriveDetails::list_active_for_driver(pool, driver_id).await?)
}

/// Stop requests on one of the driver's drives
pub async fn view_requested_stops(
    pool: &PgPool,
    driver_id: i64,
    drive_id: i64,
) -> ServiceResult<Vec<StopDetails>> {
    let mut conn = pool.acquire().await?;
    owned_drive(&mut conn, driver_id, drive_id).await?;
    Ok(StopDetails::list_for_drive(&mut *conn, drive_id).await?)
}

/// Loads a stop and checks the driver owns its drive
async fn owned_stop(conn: &mut PgConnection, driver_id: i64, stop_id: i64) -> ServiceResult<(Stop, Drive)> {
    let stop = Stop::find_by_id(&mut *conn, stop_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(STOP_NOT_FOUND))?;

    let drive = Drive::find_by_id(&mut *conn, stop.drive_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(STOP_NOT_FOUND))?;

    if drive.driver_id != driver_id {
        return Err(ServiceError::forbidden(UNAUTHORIZED_STOP));
    }
    Ok((stop, drive))
}

async fn decide_stop(
    pool: &PgPool,
    driver_id: i64,
    stop_id: i64,
    decision: StopStatus,
    eta: Option<&str>,
    status_message: Option<&str>,
) -> ServiceResult<Stop> {
    let mut tx = pool.begin().await?;
    let (stop, drive) = owned_stop(&mut tx, driver_id, stop_id).await?;

    if !stop.status.can_transition_to(decision) {
        return Err(ServiceError::invalid("Only pending stop requests can be decided."));
    }

    let stop = Stop::decide(&mut *tx, stop.id, decision, eta, status_message).await?;

    let message = match decision {
        StopStatus::Subscribed => messages::stop_approved(
            drive.id,
            stop.eta.as_deref(),
            stop.status_message.as_deref(),
        ),
        _ => messages::stop_rejected(drive.id, status_message),
    };
    notify::notify(&mut tx, stop.resident_id, &message).await?;
    tx.commit().await?;

    tracing::info!(driver_id, stop_id, drive_id = drive.id, decision = %decision, "Stop decided");
    Ok(stop)
}

/// Approves a pending stop, optionally attaching an ETA and status text
pub async fn approve_stop(
    pool: &PgPool,
    driver_id: i64,
    stop_id: i64,
    eta: Option<&str>,
    status_message: Option<&str>,
) -> ServiceResult<Stop> {
    let eta = non_blank(eta);
    let status_message = non_blank(status_message);
    check_length(eta, "ETA", MAX_ETA_LEN)?;
    check_length(status_message, "Status message", MAX_STATUS_LEN)?;

    decide_stop(pool, driver_id, stop_id, StopStatus::Subscribed, eta, status_message).await
}

/// Rejects a pending stop; the reason is stored as the status message
pub async fn reject_stop(
    pool: &PgPool,
    driver_id: i64,
    stop_id: i64,
    reason: Option<&str>,
) -> ServiceResult<Stop> {
    let reason = non_blank(reason);
    check_length(reason, "Reason", MAX_STATUS_LEN)?;

    decide_stop(pool, driver_id, stop_id, StopStatus::Rejected, None, reason).await
}

/// Sends an ETA and/or status update to a resident with a stop on the drive
pub async fn send_stop_update(
    pool: &PgPool,
    driver_id: i64,
    resident_id: i64,
    drive_id: i64,
    eta: Option<&str>,
    status_message: Option<&str>,
) -> ServiceResult<Stop> {
    let eta = non_blank(eta);
    let status_message = non_blank(status_message);
    if eta.is_none() && status_message.is_none() {
        return Err(ServiceError::invalid("Please enter an ETA or status message."));
    }
    check_length(eta, "ETA", MAX_ETA_LEN)?;
    check_length(status_message, "Status message", MAX_STATUS_LEN)?;

    let mut tx = pool.begin().await?;
    owned_drive(&mut tx, driver_id, drive_id).await?;

    let resident = Resident::find_by_id(&mut *tx, resident_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Resident not found."))?;
    let stop = Stop::find_for_pair(&mut *tx, drive_id, resident_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(STOP_NOT_FOUND))?;

    let stop = Stop::update_eta_status(&mut *tx, stop.id, eta, status_message).await?;

    let street = Street::find_by_id(&mut *tx, resident.street_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(INVALID_STREET))?;
    let area = Area::find_by_id(&mut *tx, resident.area_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(INVALID_AREA))?;

    let message = messages::stop_update(drive_id, &street.name, &area.name, eta, status_message);
    notify::notify(&mut tx, resident_id, &message).await?;
    tx.commit().await?;

    tracing::info!(driver_id, drive_id, resident_id, "Stop update sent");
    Ok(stop)
}

/// Sets the quantity of a catalog item in the driver's stock
pub async fn update_stock(
    pool: &PgPool,
    driver_id: i64,
    item_id: i64,
    quantity: i32,
) -> ServiceResult<DriverStock> {
    if quantity < 0 {
        return Err(ServiceError::invalid("Quantity cannot be negative."));
    }

    let mut tx = pool.begin().await?;
    require_driver(&mut tx, driver_id).await?;
    if Item::find_by_id(&mut *tx, item_id).await?.is_none() {
        return Err(ServiceError::not_found(INVALID_ITEM));
    }

    let stock = DriverStock::upsert(&mut *tx, driver_id, item_id, quantity).await?;
    tx.commit().await?;

    tracing::info!(driver_id, item_id, quantity, "Stock updated");
    Ok(stock)
}

/// Stocks an item by name, creating the catalog entry when it is new
///
/// An existing item keeps its price unless a new one is given.
pub async fn add_stock_by_name(
    pool: &PgPool,
    driver_id: i64,
    name: &str,
    price: Option<Decimal>,
    quantity: i32,
) -> ServiceResult<DriverStock> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::invalid("Please provide item name and quantity."));
    }
    check_length(Some(name), "Item name", MAX_NAME_LEN)?;
    if quantity < 0 {
        return Err(ServiceError::invalid("Quantity cannot be negative."));
    }
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(ServiceError::invalid("Price cannot be negative."));
    }

    let mut tx = pool.begin().await?;
    require_driver(&mut tx, driver_id).await?;

    let item = match Item::find_by_name(&mut *tx, name).await? {
        Some(item) => match price {
            Some(price) => Item::set_price(&mut *tx, item.id, price.round_dp(2))
                .await?
                .ok_or_else(|| ServiceError::not_found(INVALID_ITEM))?,
            None => item,
        },
        None => {
            Item::create(
                &mut *tx,
                CreateItem {
                    name: name.to_string(),
                    price: price.unwrap_or(Decimal::ZERO).round_dp(2),
                    ..Default::default()
                },
            )
            .await?
        }
    };

    let stock = DriverStock::upsert(&mut *tx, driver_id, item.id, quantity).await?;
    tx.commit().await?;

    tracing::info!(driver_id, item_id = item.id, quantity, "Stock added by name");
    Ok(stock)
}

pub async fn remove_stock(pool: &PgPool, driver_id: i64, stock_id: i64) -> ServiceResult<()> {
    if !DriverStock::delete(pool, driver_id, stock_id).await? {
        return Err(ServiceError::not_found("Stock entry not found."));
    }

    tracing::info!(driver_id, stock_id, "Stock removed");
    Ok(())
}

pub async fn view_stock(pool: &PgPool, driver_id: i64) -> ServiceResult<Vec<StockLine>> {
    Ok(StockLine::list_for_driver(pool, driver_id).await?)
}
