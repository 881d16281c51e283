//! Admin dashboard: lists everything and hosts the create forms

use super::{check_role, int_field, render, text_field, Chrome, Notice};
use crate::{app::AppState, error::ApiResult};
use askama::Template;
use axum::{extract::State, response::Response, Extension, Form};
use breadvan_shared::{
    auth::middleware::AuthContext,
    models::{area::Area, item::CreateItem, item::Item, user::UserRole},
    services::{admin, resident::NewResident, user, ServiceError, ServiceResult},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

pub struct StreetRow {
    pub id: i64,
    pub area_name: String,
    pub name: String,
}

pub struct DriverRow {
    pub id: i64,
    pub username: String,
    pub status: String,
    pub location: String,
}

pub struct ResidentRow {
    pub id: i64,
    pub username: String,
    pub address: String,
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminPage {
    pub chrome: Chrome,
    pub areas: Vec<Area>,
    pub streets: Vec<StreetRow>,
    pub items: Vec<Item>,
    pub drivers: Vec<DriverRow>,
    pub residents: Vec<ResidentRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AccountForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResidentForm {
    pub username: String,
    pub password: String,
    pub area_id: Option<String>,
    pub street_id: Option<String>,
    pub house_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AreaForm {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StreetForm {
    pub area_id: Option<String>,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub price: Option<String>,
    pub description: String,
    /// Comma separated
    pub tags: String,
}

async fn page(state: &AppState, auth: &AuthContext, notice: Notice) -> ApiResult<Response> {
    let me = user::get_user(&state.db, auth.user_id).await?;

    let areas = admin::list_areas(&state.db).await?;
    let streets = admin::list_streets(&state.db, None).await?;
    let area_names: HashMap<i64, &str> = areas.iter().map(|a| (a.id, a.name.as_str())).collect();
    let street_names: HashMap<i64, &str> =
        streets.iter().map(|s| (s.id, s.name.as_str())).collect();

    let place = |area_id: i64, street_id: i64| {
        format!(
            "{}, {}",
            street_names.get(&street_id).copied().unwrap_or("?"),
            area_names.get(&area_id).copied().unwrap_or("?")
        )
    };

    let drivers = admin::list_drivers(&state.db)
        .await?
        .into_iter()
        .map(|d| DriverRow {
            id: d.id,
            username: d.username,
            status: d.status.to_string(),
            location: match (d.area_id, d.street_id) {
                (Some(area), Some(street)) => place(area, street),
                (Some(area), None) => area_names.get(&area).copied().unwrap_or("?").to_string(),
                _ => "-".to_string(),
            },
        })
        .collect();

    let residents = admin::list_residents(&state.db)
        .await?
        .into_iter()
        .map(|r| ResidentRow {
            id: r.id,
            address: format!("#{} {}", r.house_number, place(r.area_id, r.street_id)),
            username: r.username,
        })
        .collect();

    let street_rows = streets
        .iter()
        .map(|s| StreetRow {
            id: s.id,
            area_name: area_names.get(&s.area_id).copied().unwrap_or("?").to_string(),
            name: s.name.clone(),
        })
        .collect();

    render(&AdminPage {
        chrome: Chrome {
            username: me.username,
            notice,
        },
        areas,
        streets: street_rows,
        items: admin::list_items(&state.db).await?,
        drivers,
        residents,
    })
}

/// Runs one admin form action and re-renders the dashboard
async fn act<F>(state: AppState, auth: AuthContext, action: F) -> ApiResult<Response>
where
    F: std::future::Future<Output = ServiceResult<String>>,
{
    if let Err(redirect) = check_role(&auth, UserRole::Admin) {
        return Ok(redirect);
    }
    let notice = Notice::from_outcome(action.await)?;
    page(&state, &auth, notice).await
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Response> {
    if let Err(redirect) = check_role(&auth, UserRole::Admin) {
        return Ok(redirect);
    }
    page(&state, &auth, Notice::default()).await
}

pub async fn create_driver(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<AccountForm>,
) -> ApiResult<Response> {
    let pool = state.db.clone();
    act(state, auth, async move {
        if form.username.trim().is_empty() || form.password.is_empty() {
            return Err(ServiceError::invalid("Username and password are required."));
        }
        let driver = admin::create_driver(&pool, &form.username, &form.password).await?;
        Ok(format!("Driver '{}' created successfully.", driver.username))
    })
    .await
}

pub async fn create_resident(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<ResidentForm>,
) -> ApiResult<Response> {
    let pool = state.db.clone();
    act(state, auth, async move {
        if form.username.trim().is_empty() || form.password.is_empty() {
            return Err(ServiceError::invalid("All resident fields are required."));
        }
        let resident = admin::create_resident(
            &pool,
            NewResident {
                username: form.username,
                password: form.password,
                area_id: int_field(&form.area_id, "Area")?,
                street_id: int_field(&form.street_id, "Street")?,
                house_number: int_field(&form.house_number, "House number")?,
            },
        )
        .await?;
        Ok(format!(
            "Resident '{}' created at #{}.",
            resident.username, resident.house_number
        ))
    })
    .await
}

pub async fn add_area(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<AreaForm>,
) -> ApiResult<Response> {
    let pool = state.db.clone();
    act(state, auth, async move {
        let area = admin::add_area(&pool, &form.name).await?;
        Ok(format!("Area '{}' added.", area.name))
    })
    .await
}

pub async fn add_street(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<StreetForm>,
) -> ApiResult<Response> {
    let pool = state.db.clone();
    act(state, auth, async move {
        let area_id = int_field(&form.area_id, "Area")?;
        let street = admin::add_street(&pool, area_id, &form.name).await?;
        Ok(format!("Street '{}' added.", street.name))
    })
    .await
}

pub async fn add_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<ItemForm>,
) -> ApiResult<Response> {
    let pool = state.db.clone();
    act(state, auth, async move {
        let price = match text_field(&form.price) {
            Some(raw) => raw
                .parse::<Decimal>()
                .map_err(|_| ServiceError::invalid("Price must be a valid number."))?,
            None => Decimal::ZERO,
        };
        let item = admin::add_item(
            &pool,
            CreateItem {
                name: form.name,
                price,
                description: form.description,
                tags: form.tags.split(',').map(str::to_string).collect(),
            },
        )
        .await?;
        Ok(format!("Item '{}' added.", item.name))
    })
    .await
}
