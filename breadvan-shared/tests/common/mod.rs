//! Fixtures shared by the database tests
//!
//! Every test gets a fresh database from `#[sqlx::test]`, so fixtures can use
//! fixed names.

#![allow(dead_code)]

use breadvan_shared::models::{area::Area, driver::Driver, drive::DriveDetails, resident::Resident, street::Street};
use breadvan_shared::schedule;
use breadvan_shared::services::{admin, driver, resident::NewResident};
use chrono::Duration;
use sqlx::PgPool;

pub struct Town {
    pub area: Area,
    pub warner: Street,
    pub gordon: Street,
}

pub async fn town(pool: &PgPool) -> Town {
    let area = admin::add_area(pool, "St. Augustine").await.unwrap();
    let warner = admin::add_street(pool, area.id, "Warner Street").await.unwrap();
    let gordon = admin::add_street(pool, area.id, "Gordon Street").await.unwrap();
    Town { area, warner, gordon }
}

pub async fn driver(pool: &PgPool, username: &str) -> Driver {
    admin::create_driver(pool, username, "driverpass").await.unwrap()
}

pub async fn resident(pool: &PgPool, username: &str, street: &Street, house_number: i32) -> Resident {
    admin::create_resident(
        pool,
        NewResident {
            username: username.to_string(),
            password: "residentpass".to_string(),
            area_id: street.area_id,
            street_id: street.id,
            house_number,
        },
    )
    .await
    .unwrap()
}

/// `YYYY-MM-DD` for a day relative to today
pub fn day(offset: i64) -> String {
    (schedule::local_now().date() + Duration::days(offset))
        .format(schedule::DATE_FORMAT)
        .to_string()
}

/// Schedules a drive tomorrow at 10:00 on the given street
pub async fn drive_tomorrow(pool: &PgPool, driver_id: i64, street: &Street) -> DriveDetails {
    driver::schedule_drive(pool, driver_id, street.area_id, street.id, &day(1), "10:00")
        .await
        .unwrap()
}
