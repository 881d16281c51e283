//! Drive lifecycle against a real database

mod common;

use breadvan_shared::models::{drive::DriveStatus, driver::DriverStatus};
use breadvan_shared::services::{driver, notify, resident, ServiceError};
use sqlx::PgPool;

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_schedule_notifies_street_residents(pool: PgPool) {
    let town = common::town(&pool).await;
    let mary = common::driver(&pool, "mary").await;
    let alice = common::resident(&pool, "alice", &town.warner, 48).await;
    let john = common::resident(&pool, "john", &town.gordon, 13).await;

    let drive = common::drive_tomorrow(&pool, mary.id, &town.warner).await;
    assert_eq!(drive.status, DriveStatus::Upcoming);
    assert_eq!(drive.street_name, "Warner Street");

    let inbox = notify::inbox(&pool, alice.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].ends_with(&format!(
        "]: SCHEDULED>> Drive {} by Driver mary on {} at 10:00",
        drive.id,
        common::day(1)
    )));

    assert!(notify::inbox(&pool, john.id).await.unwrap().is_empty());
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_schedule_validation(pool: PgPool) {
    let town = common::town(&pool).await;
    let mary = common::driver(&pool, "mary").await;
    let (area, street) = (town.area.id, town.warner.id);

    let err = driver::schedule_drive(&pool, mary.id, area, street, "tomorrow", "10:00")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid date or time format. Use YYYY-MM-DD and HH:MM.");

    let err = driver::schedule_drive(&pool, mary.id, area, street, &common::day(-1), "10:00")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot schedule a drive in the past.");

    let err = driver::schedule_drive(&pool, mary.id, area, street, &common::day(61), "10:00")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot schedule a drive more than 60 days in advance.");

    let err = driver::schedule_drive(&pool, mary.id, area, 9999, &common::day(1), "10:00")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid street ID.");
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_start_and_end_drive(pool: PgPool) {
    let town = common::town(&pool).await;
    let mary = common::driver(&pool, "mary").await;
    let first = common::drive_tomorrow(&pool, mary.id, &town.warner).await;
    let second = common::drive_tomorrow(&pool, mary.id, &town.gordon).await;

    let started = driver::start_drive(&pool, mary.id, first.id).await.unwrap();
    assert_eq!(started.status, DriveStatus::InProgress);

    let profile = resident::view_driver_stats(&pool, mary.id).await.unwrap();
    assert_eq!(profile.status, DriverStatus::Busy);
    assert_eq!(profile.street_id, Some(town.warner.id));

    let err = driver::start_drive(&pool, mary.id, second.id).await.unwrap_err();
    assert_eq!(err.to_string(), format!("You are already on drive {}.", first.id));

    let ended = driver::end_drive(&pool, mary.id).await.unwrap();
    assert_eq!(ended.id, first.id);
    assert_eq!(ended.status, DriveStatus::Completed);

    let profile = resident::view_driver_stats(&pool, mary.id).await.unwrap();
    assert_eq!(profile.status, DriverStatus::Available);

    let err = driver::end_drive(&pool, mary.id).await.unwrap_err();
    assert_eq!(err.to_string(), "No drive in progress.");

    let err = driver::start_drive(&pool, mary.id, first.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Drive not found or cannot be started.");

    let drives = driver::view_drives(&pool, mary.id).await.unwrap();
    assert_eq!(drives.iter().map(|d| d.id).collect::<Vec<_>>(), vec![second.id]);
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_cannot_start_someone_elses_drive(pool: PgPool) {
    let town = common::town(&pool).await;
    let mary = common::driver(&pool, "mary").await;
    let bob = common::driver(&pool, "bob").await;
    let drive = common::drive_tomorrow(&pool, mary.id, &town.warner).await;

    let err = driver::start_drive(&pool, bob.id, drive.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Drive not found or cannot be started.");

    let err = driver::cancel_drive(&pool, bob.id, drive.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[sqlx::test(migrator = "breadvan_shared::db::MIGRATOR")]
async fn test_cancel_drive_notifies_street(pool: PgPool) {
    let town = common::town(&pool).await;
    let mary = common::driver(&pool, "mary").await;
    let alice = common::resident(&pool, "alice", &town.warner, 48).await;
    let drive = common::drive_tomorrow(&pool, mary.id, &town.warner).await;

    let cancelled = driver::cancel_drive(&pool, mary.id, drive.id).await.unwrap();
    assert_eq!(cancelled.status, DriveStatus::Cancelled);

    let inbox = notify::inbox(&pool, alice.id).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox[1].contains(&format!("CANCELLED>> Drive {} by Driver mary", drive.id)));

    let err = driver::cancel_drive(&pool, mary.id, drive.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Only upcoming drives can be cancelled.");

    assert!(driver::view_drives(&pool, mary.id).await.unwrap().is_empty());
}
