//! Demo data
//!
//! [`initialize`] wipes every table and loads a small fixed dataset;
//! [`seed_demo_areas`] only adds missing areas and streets.

use chrono::{Duration, NaiveTime};
use sqlx::{PgConnection, PgPool};

use super::{messages, notify, user::insert_user, ServiceError, ServiceResult};
use crate::models::{
    area::Area,
    drive::{CreateDrive, Drive},
    driver::{Driver, DriverStatus},
    resident::Resident,
    stop::Stop,
    street::Street,
    user::{User, UserRole},
};
use crate::schedule;

/// Counts of what [`initialize`] created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub areas: usize,
    pub streets: usize,
    pub drives: usize,
    pub stops: usize,
}

const DEMO_AREAS: &[(&str, &[&str])] = &[
    (
        "St. Augustine",
        &["Agostini Street", "St Augustine Circular", "Evans Street"],
    ),
    (
        "Curepe",
        &["Southern Main Road", "Cipriani Street", "Evans Street Extension"],
    ),
    ("Sangre Grande", &["Picton Road", "Foster Road"]),
];

async fn area(conn: &mut PgConnection, name: &str, streets: &[&str]) -> ServiceResult<(Area, Vec<Street>)> {
    let area = Area::create(&mut *conn, name).await?;
    let mut created = Vec::with_capacity(streets.len());
    for street in streets {
        created.push(Street::create(&mut *conn, area.id, street).await?);
    }
    Ok((area, created))
}

async fn driver(
    conn: &mut PgConnection,
    username: &str,
    password: &str,
    status: DriverStatus,
    area_id: i64,
    street_id: Option<i64>,
) -> ServiceResult<User> {
    let user = insert_user(conn, username, password, UserRole::Driver).await?;
    Driver::create_profile(&mut *conn, user.id, status, Some(area_id), street_id).await?;
    Ok(user)
}

async fn resident(
    conn: &mut PgConnection,
    username: &str,
    password: &str,
    street: &Street,
    house_number: i32,
) -> ServiceResult<User> {
    let user = insert_user(conn, username, password, UserRole::Resident).await?;
    Resident::create_profile(&mut *conn, user.id, street.area_id, street.id, house_number).await?;
    Ok(user)
}

fn street<'a>(streets: &'a [Street], name: &str) -> ServiceResult<&'a Street> {
    streets
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| ServiceError::not_found(format!("Seed street {} missing.", name)))
}

/// Drops all data and loads the demo dataset
///
/// Creates `admin/adminpass`, three areas with streets, drivers `bob` and
/// `mary`, residents `alice`, `jane` and `john`, and a drive by `mary` to
/// Warner Street tomorrow at 10:00 on which `jane` has a pending stop.
pub async fn initialize(pool: &PgPool) -> ServiceResult<SeedSummary> {
    let mut tx = pool.begin().await?;

    sqlx::query("TRUNCATE users, areas, items RESTART IDENTITY CASCADE")
        .execute(&mut *tx)
        .await?;

    let mut summary = SeedSummary::default();

    insert_user(&mut tx, "admin", "adminpass", UserRole::Admin).await?;

    let (st_augustine, st_augustine_streets) =
        area(&mut tx, "St. Augustine", &["Gordon Street", "Warner Street", "College Road"]).await?;
    let (tunapuna, tunapuna_streets) =
        area(&mut tx, "Tunapuna", &["Fairly Street", "Saint John Road"]).await?;
    area(&mut tx, "San Juan", &[]).await?;
    summary.areas = 3;
    summary.streets = st_augustine_streets.len() + tunapuna_streets.len();

    let gordon = street(&st_augustine_streets, "Gordon Street")?;
    let warner = street(&st_augustine_streets, "Warner Street")?;
    let fairly = street(&tunapuna_streets, "Fairly Street")?;

    driver(&mut tx, "bob", "bobpass", DriverStatus::Offline, st_augustine.id, Some(gordon.id)).await?;
    let mary = driver(&mut tx, "mary", "marypass", DriverStatus::Available, tunapuna.id, None).await?;

    resident(&mut tx, "alice", "alicepass", warner, 48).await?;
    let jane = resident(&mut tx, "jane", "janepass", warner, 50).await?;
    resident(&mut tx, "john", "johnpass", fairly, 13).await?;
    summary.users = 6;

    let tomorrow = schedule::local_now().date() + Duration::days(1);
    let ten = NaiveTime::from_hms_opt(10, 0, 0)
        .ok_or_else(|| ServiceError::invalid("Invalid seed time."))?;

    let drive = Drive::create(
        &mut *tx,
        CreateDrive {
            driver_id: mary.id,
            area_id: st_augustine.id,
            street_id: warner.id,
            scheduled_date: tomorrow,
            scheduled_time: ten,
        },
    )
    .await?;
    let scheduled = messages::drive_scheduled(drive.id, &mary.username, tomorrow, ten);
    notify::notify_street(&mut tx, warner.id, &scheduled).await?;
    summary.drives = 1;

    Stop::create(&mut *tx, drive.id, jane.id).await?;
    let requested = messages::stop_requested(drive.id, &warner.name, &st_augustine.name, ten);
    notify::notify(&mut tx, jane.id, &requested).await?;
    summary.stops = 1;

    tx.commit().await?;

    tracing::info!(
        users = summary.users,
        areas = summary.areas,
        drives = summary.drives,
        "Database initialized"
    );
    Ok(summary)
}

/// Adds the demo areas and streets that do not exist yet
///
/// Returns the number of streets inserted. Nothing is deleted.
pub async fn seed_demo_areas(pool: &PgPool) -> ServiceResult<usize> {
    let mut tx = pool.begin().await?;
    let mut added = 0;

    for (area_name, streets) in DEMO_AREAS {
        let area = match Area::find_by_name(&mut *tx, area_name).await? {
            Some(area) => area,
            None => Area::create(&mut *tx, area_name).await?,
        };

        for street_name in *streets {
            if Street::find_by_name(&mut *tx, area.id, street_name)
                .await?
                .is_none()
            {
                Street::create(&mut *tx, area.id, street_name).await?;
                added += 1;
            }
        }
    }

    tx.commit().await?;

    tracing::info!(streets_added = added, "Demo areas seeded");
    Ok(added)
}
