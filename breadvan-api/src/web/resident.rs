//! Resident dashboard: drives on my street, my stop requests, menus, inbox

use super::{check_role, int_field, render, Chrome, Notice};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use askama::Template;
use axum::{extract::State, response::Response, Extension, Form};
use breadvan_shared::{
    auth::middleware::AuthContext,
    models::{
        area::Area, drive::DriveStatus, resident::Resident, stock::StockLine, stop::StopStatus,
        street::Street, user::UserRole,
    },
    schedule,
    services::{notify, resident, ServiceError, ServiceResult},
};
use serde::Deserialize;
use sqlx::PgPool;

pub struct DriveRow {
    pub id: i64,
    pub when: String,
    pub driver: String,
    pub status: String,
    /// Empty when no stop was requested
    pub my_stop: String,
    pub can_request: bool,
    pub can_cancel: bool,
}

pub struct Menu {
    pub driver: String,
    pub lines: Vec<StockLine>,
}

#[derive(Template)]
#[template(path = "resident_dashboard.html")]
pub struct ResidentPage {
    pub chrome: Chrome,
    pub address: String,
    pub drives: Vec<DriveRow>,
    pub menus: Vec<Menu>,
    pub inbox: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResidentForm {
    pub action: String,
    pub drive_id: Option<String>,
}

async fn page(state: &AppState, auth: &AuthContext, notice: Notice) -> ApiResult<Response> {
    let me = Resident::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(resident::RESIDENT_NOT_FOUND.to_string()))?;

    let street = Street::find_by_id(&state.db, me.street_id).await?;
    let area = Area::find_by_id(&state.db, me.area_id).await?;
    let address = format!(
        "#{} {}, {}",
        me.house_number,
        street.map(|s| s.name).unwrap_or_default(),
        area.map(|a| a.name).unwrap_or_default()
    );

    let street_drives = resident::street_drives(&state.db, auth.user_id).await?;

    let mut menus: Vec<Menu> = Vec::new();
    for entry in &street_drives {
        if menus.iter().any(|m| m.driver == entry.drive.driver_username) {
            continue;
        }
        menus.push(Menu {
            driver: entry.drive.driver_username.clone(),
            lines: resident::view_stock(&state.db, entry.drive.driver_id).await?,
        });
    }

    let drives = street_drives
        .into_iter()
        .map(|entry| {
            let stop_status = entry.stop_status();
            DriveRow {
                id: entry.drive.id,
                when: format!(
                    "{} {}",
                    entry.drive.scheduled_date.format(schedule::DATE_FORMAT),
                    schedule::format_time(entry.drive.scheduled_time)
                ),
                driver: entry.drive.driver_username,
                status: entry.drive.status.to_string(),
                my_stop: stop_status.map(|s| s.to_string()).unwrap_or_default(),
                can_request: stop_status.is_none() && entry.drive.status == DriveStatus::Upcoming,
                can_cancel: stop_status == Some(StopStatus::Pending),
            }
        })
        .collect();

    render(&ResidentPage {
        chrome: Chrome {
            username: me.username,
            notice,
        },
        address,
        drives,
        menus,
        inbox: notify::inbox(&state.db, auth.user_id).await?,
    })
}

async fn run_action(pool: &PgPool, resident_id: i64, form: ResidentForm) -> ServiceResult<String> {
    let drive_id = int_field(&form.drive_id, "Drive")?;
    match form.action.as_str() {
        "request_stop" => {
            resident::request_stop(pool, resident_id, drive_id).await?;
            Ok(format!("Stop requested for drive #{}.", drive_id))
        }
        "cancel_stop" => {
            resident::cancel_stop(pool, resident_id, drive_id).await?;
            Ok(format!("Stop request for drive #{} cancelled.", drive_id))
        }
        other => Err(ServiceError::invalid(format!("Unknown action '{}'.", other))),
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Response> {
    if let Err(redirect) = check_role(&auth, UserRole::Resident) {
        return Ok(redirect);
    }
    page(&state, &auth, Notice::default()).await
}

pub async fn action(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<ResidentForm>,
) -> ApiResult<Response> {
    if let Err(redirect) = check_role(&auth, UserRole::Resident) {
        return Ok(redirect);
    }

    let notice = Notice::from_outcome(run_action(&state.db, auth.user_id, form).await)?;
    page(&state, &auth, notice).await
}
