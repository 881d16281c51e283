//! Admin operations: geography, catalog and accounts

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{
    foreign_key_as_conflict, required, resident::NewResident, unique_as_conflict, user::insert_user,
    ServiceError, ServiceResult, MAX_NAME_LEN,
};
use crate::models::{
    area::Area,
    driver::{Driver, DriverStatus},
    item::{CreateItem, Item},
    resident::Resident,
    street::Street,
    user::{User, UserRole},
};

pub const INVALID_AREA: &str = "Invalid area ID.";
pub const INVALID_STREET: &str = "Invalid street ID.";
pub const INVALID_ITEM: &str = "Invalid item ID.";
pub const DRIVER_NOT_FOUND: &str = "Driver not found.";

/// Creates a driver account, `Offline` with no location
pub async fn create_driver(pool: &PgPool, username: &str, password: &str) -> ServiceResult<Driver> {
    let mut tx = pool.begin().await?;

    let user = insert_user(&mut tx, username, password, UserRole::Driver).await?;
    Driver::create_profile(&mut *tx, user.id, DriverStatus::Offline, None, None).await?;
    let driver = Driver::find_by_id(&mut *tx, user.id)
        .await?
        .ok_or_else(|| ServiceError::not_found(DRIVER_NOT_FOUND))?;

    tx.commit().await?;

    tracing::info!(driver_id = driver.id, username = %driver.username, "Driver created");
    Ok(driver)
}

/// Deletes a driver together with their drives, stock and inbox
pub async fn delete_driver(pool: &PgPool, driver_id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    if Driver::find_by_id(&mut *tx, driver_id).await?.is_none() {
        return Err(ServiceError::not_found(DRIVER_NOT_FOUND));
    }
    User::delete(&mut *tx, driver_id).await?;
    tx.commit().await?;

    tracing::info!(driver_id, "Driver deleted");
    Ok(())
}

pub async fn create_resident(pool: &PgPool, data: NewResident) -> ServiceResult<Resident> {
    super::resident::create_resident(pool, data).await
}

pub async fn add_area(pool: &PgPool, name: &str) -> ServiceResult<Area> {
    let name = required(name, "Area name", MAX_NAME_LEN)?;

    let area = Area::create(pool, &name)
        .await
        .map_err(|e| unique_as_conflict(e, "Area already exists."))?;

    tracing::info!(area_id = area.id, name = %area.name, "Area added");
    Ok(area)
}

/// Deletes an area and its streets
///
/// Refused while residents or drives still reference one of its streets.
pub async fn delete_area(pool: &PgPool, area_id: i64) -> ServiceResult<()> {
    let deleted = Area::delete(pool, area_id)
        .await
        .map_err(|e| foreign_key_as_conflict(e, "Area is still in use by residents or drives."))?;

    if !deleted {
        return Err(ServiceError::not_found(INVALID_AREA));
    }

    tracing::info!(area_id, "Area deleted");
    Ok(())
}

pub async fn list_areas(pool: &PgPool) -> ServiceResult<Vec<Area>> {
    Ok(Area::list(pool).await?)
}

pub async fn add_street(pool: &PgPool, area_id: i64, name: &str) -> ServiceResult<Street> {
    let name = required(name, "Street name", MAX_NAME_LEN)?;

    let mut tx = pool.begin().await?;
    if Area::find_by_id(&mut *tx, area_id).await?.is_none() {
        return Err(ServiceError::not_found(INVALID_AREA));
    }

    let street = Street::create(&mut *tx, area_id, &name)
        .await
        .map_err(|e| unique_as_conflict(e, "Street already exists in this area."))?;
    tx.commit().await?;

    tracing::info!(area_id, street_id = street.id, name = %street.name, "Street added");
    Ok(street)
}

/// Deletes a street, which must belong to `area_id`
pub async fn delete_street(pool: &PgPool, area_id: i64, street_id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    if Street::find_in_area(&mut *tx, area_id, street_id).await?.is_none() {
        return Err(ServiceError::not_found(INVALID_STREET));
    }
    Street::delete(&mut *tx, street_id)
        .await
        .map_err(|e| foreign_key_as_conflict(e, "Street is still in use by residents or drives."))?;
    tx.commit().await?;

    tracing::info!(area_id, street_id, "Street deleted");
    Ok(())
}

pub async fn list_streets(pool: &PgPool, area_id: Option<i64>) -> ServiceResult<Vec<Street>> {
    Ok(Street::list(pool, area_id).await?)
}

pub async fn add_item(pool: &PgPool, data: CreateItem) -> ServiceResult<Item> {
    let name = required(&data.name, "Item name", MAX_NAME_LEN)?;
    if data.price < Decimal::ZERO {
        return Err(ServiceError::invalid("Price cannot be negative."));
    }

    let tags = data
        .tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let item = Item::create(
        pool,
        CreateItem {
            name,
            price: data.price.round_dp(2),
            description: data.description.trim().to_string(),
            tags,
        },
    )
    .await
    .map_err(|e| unique_as_conflict(e, "Item already exists."))?;

    tracing::info!(item_id = item.id, name = %item.name, "Item added");
    Ok(item)
}

pub async fn delete_item(pool: &PgPool, item_id: i64) -> ServiceResult<()> {
    if !Item::delete(pool, item_id).await? {
        return Err(ServiceError::not_found(INVALID_ITEM));
    }

    tracing::info!(item_id, "Item deleted");
    Ok(())
}

pub async fn list_items(pool: &PgPool) -> ServiceResult<Vec<Item>> {
    Ok(Item::list(pool).await?)
}

pub async fn list_drivers(pool: &PgPool) -> ServiceResult<Vec<Driver>> {
    Ok(Driver::list(pool).await?)
}

pub async fn list_residents(pool: &PgPool) -> ServiceResult<Vec<Resident>> {
    Ok(Resident::list(pool).await?)
}
