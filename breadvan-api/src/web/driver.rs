//! Driver dashboard
//!
//! A single form endpoint dispatches on the `action` field.

use super::{check_role, int_field, render, text_field, Chrome, Notice};
use crate::{app::AppState, error::ApiResult};
use askama::Template;
use axum::{extract::State, response::Response, Extension, Form};
use breadvan_shared::{
    auth::middleware::AuthContext,
    models::{area::Area, drive::DriveStatus, stock::StockLine, stop::StopStatus, user::UserRole},
    schedule,
    services::{admin, driver, notify, resident::view_driver_stats, ServiceError, ServiceResult},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct StreetOption {
    pub id: i64,
    pub label: String,
}

pub struct StopRow {
    pub id: i64,
    pub resident_id: i64,
    pub resident: String,
    pub house_number: i32,
    pub status: String,
    pub pending: bool,
    pub eta: String,
    pub message: String,
}

pub struct DriveRow {
    pub id: i64,
    pub when: String,
    pub place: String,
    pub status: String,
    pub upcoming: bool,
    pub in_progress: bool,
    pub stops: Vec<StopRow>,
}

#[derive(Template)]
#[template(path = "driver_dashboard.html")]
pub struct DriverPage {
    pub chrome: Chrome,
    pub status: String,
    pub areas: Vec<Area>,
    pub streets: Vec<StreetOption>,
    pub drives: Vec<DriveRow>,
    pub stock: Vec<StockLine>,
    pub inbox: Vec<String>,
}

/// Every field the dashboard forms can send; each action reads its own
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DriverForm {
    pub action: String,
    pub date_str: Option<String>,
    pub time_str: Option<String>,
    pub area_id: Option<String>,
    pub street_id: Option<String>,
    pub drive_id: Option<String>,
    pub stop_id: Option<String>,
    pub resident_id: Option<String>,
    pub eta_text: Option<String>,
    pub status_text: Option<String>,
    pub reason: Option<String>,
    pub item_name: Option<String>,
    pub item_price: Option<String>,
    pub item_quantity: Option<String>,
    pub stock_id: Option<String>,
}

async fn page(state: &AppState, auth: &AuthContext, notice: Notice) -> ApiResult<Response> {
    let me = view_driver_stats(&state.db, auth.user_id).await?;

    let areas = admin::list_areas(&state.db).await?;
    let area_names: HashMap<i64, &str> = areas.iter().map(|a| (a.id, a.name.as_str())).collect();
    let streets = admin::list_streets(&state.db, None)
        .await?
        .into_iter()
        .map(|s| StreetOption {
            id: s.id,
            label: format!(
                "{} / {}",
                area_names.get(&s.area_id).copied().unwrap_or("?"),
                s.name
            ),
        })
        .collect();

    let mut drives = Vec::new();
    for drive in driver::view_drives(&state.db, auth.user_id).await? {
        let stops = driver::view_requested_stops(&state.db, auth.user_id, drive.id)
            .await?
            .into_iter()
            .map(|s| StopRow {
                id: s.id,
                resident_id: s.resident_id,
                resident: s.resident_username,
                house_number: s.house_number,
                status: s.status.to_string(),
                pending: s.status == StopStatus::Pending,
                eta: s.eta.unwrap_or_default(),
                message: s.status_message.unwrap_or_default(),
            })
            .collect();

        drives.push(DriveRow {
            id: drive.id,
            when: format!(
                "{} {}",
                drive.scheduled_date.format(schedule::DATE_FORMAT),
                schedule::format_time(drive.scheduled_time)
            ),
            place: format!("{}, {}", drive.street_name, drive.area_name),
            status: drive.status.to_string(),
            upcoming: drive.status == DriveStatus::Upcoming,
            in_progress: drive.status == DriveStatus::InProgress,
            stops,
        });
    }

    render(&DriverPage {
        chrome: Chrome {
            username: me.username,
            notice,
        },
        status: me.status.to_string(),
        areas,
        streets,
        drives,
        stock: driver::view_stock(&state.db, auth.user_id).await?,
        inbox: notify::inbox(&state.db, auth.user_id).await?,
    })
}

async fn run_action(pool: &PgPool, driver_id: i64, form: DriverForm) -> ServiceResult<String> {
    match form.action.as_str() {
        "schedule_drive" => {
            let (Some(date), Some(time)) = (text_field(&form.date_str), text_field(&form.time_str))
            else {
                return Err(ServiceError::invalid(
                    "Please fill in date, time, area and street.",
                ));
            };
            let area_id = int_field(&form.area_id, "Area")?;
            let street_id = int_field(&form.street_id, "Street")?;
            driver::schedule_drive(pool, driver_id, area_id, street_id, date, time).await?;
            Ok("Drive scheduled and residents notified.".to_string())
        }
        "start_drive" => {
            let drive = driver::start_drive(pool, driver_id, int_field(&form.drive_id, "Drive")?).await?;
            Ok(format!("Drive #{} started.", drive.id))
        }
        "end_drive" => {
            let drive = driver::end_drive(pool, driver_id).await?;
            Ok(format!("Drive #{} completed.", drive.id))
        }
        "cancel_drive" => {
            let drive =
                driver::cancel_drive(pool, driver_id, int_field(&form.drive_id, "Drive")?).await?;
            Ok(format!("Drive #{} cancelled and residents notified.", drive.id))
        }
        "approve_stop" => {
            driver::approve_stop(
                pool,
                driver_id,
                int_field(&form.stop_id, "Stop")?,
                text_field(&form.eta_text),
                text_field(&form.status_text),
            )
            .await?;
            Ok("Stop approved.".to_string())
        }
        "reject_stop" => {
            driver::reject_stop(
                pool,
                driver_id,
                int_field(&form.stop_id, "Stop")?,
                text_field(&form.reason),
            )
            .await?;
            Ok("Stop rejected.".to_string())
        }
        "send_update" => {
            driver::send_stop_update(
                pool,
                driver_id,
                int_field(&form.resident_id, "Resident")?,
                int_field(&form.drive_id, "Drive")?,
                text_field(&form.eta_text),
                text_field(&form.status_text),
            )
            .await?;
            Ok("Update sent to resident.".to_string())
        }
        "add_stock" => {
            let Some(name) = text_field(&form.item_name) else {
                return Err(ServiceError::invalid("Please provide item name and quantity."));
            };
            let quantity = int_field(&form.item_quantity, "Quantity")?;
            let price = text_field(&form.item_price)
                .map(|raw| {
                    raw.parse::<Decimal>()
                        .map_err(|_| ServiceError::invalid("Price must be a valid number."))
                })
                .transpose()?;
            driver::add_stock_by_name(pool, driver_id, name, price, quantity).await?;
            Ok("Menu updated.".to_string())
        }
        "delete_stock" => {
            driver::remove_stock(pool, driver_id, int_field(&form.stock_id, "Stock entry")?).await?;
            Ok("Item removed from your menu.".to_string())
        }
        other => Err(ServiceError::invalid(format!("Unknown action '{}'.", other))),
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Response> {
    if let Err(redirect) = check_role(&auth, UserRole::Driver) {
        return Ok(redirect);
    }
    page(&state, &auth, Notice::default()).await
}

pub async fn action(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<DriverForm>,
) -> ApiResult<Response> {
    if let Err(redirect) = check_role(&auth, UserRole::Driver) {
        return Ok(redirect);
    }

    tracing::debug!(driver_id = auth.user_id, action = %form.action, "Driver dashboard action");
    let notice = Notice::from_outcome(run_action(&state.db, auth.user_id, form).await)?;
    page(&state, &auth, notice).await
}
