//! Resident commands; everything except `create` runs as `--as <username>`

use anyhow::{Context, Result};
use breadvan_shared::{
    models::{driver::Driver, stop::Stop, user::UserRole},
    services::{
        notify,
        resident::{self, NewResident, StreetDrive},
    },
};
use clap::{Parser, Subcommand};
use sqlx::PgPool;

use super::{acting_user, admin::resident_line, drive_line, stock_line, Output};

#[derive(Parser, Debug)]
pub struct ResidentArgs {
    /// Resident to act as
    #[arg(long = "as", value_name = "USERNAME")]
    pub acting_as: Option<String>,

    #[command(subcommand)]
    pub command: ResidentCommand,
}

#[derive(Subcommand, Debug)]
pub enum ResidentCommand {
    /// Register a resident at a house on a street
    Create {
        username: String,
        password: String,
        area_id: i64,
        street_id: i64,
        house_number: i32,
    },
    #[command(flatten)]
    Act(ResidentAction),
}

/// Commands that run as an existing resident
#[derive(Subcommand, Debug)]
pub enum ResidentAction {
    /// Upcoming and in-progress drives on your street
    Drives,
    /// Ask for a stop on an upcoming drive
    RequestStop { drive_id: i64 },
    /// Withdraw a pending stop request
    CancelStop { drive_id: i64 },
    /// Notifications, oldest first
    Inbox,
    /// A driver's status and location
    Driver { driver_id: i64 },
    /// What a driver is carrying
    Stock { driver_id: i64 },
}

fn street_drive_line(d: &StreetDrive) -> String {
    let mine = d
        .my_stop
        .as_ref()
        .map(|s| format!(" - your stop: {}", s.status))
        .unwrap_or_default();
    format!("{}{}", drive_line(&d.drive), mine)
}

fn stop_line(s: &Stop) -> String {
    format!("Stop #{} on drive #{} is {}.", s.id, s.drive_id, s.status)
}

fn driver_line(d: &Driver) -> String {
    let location = match (d.area_id, d.street_id) {
        (Some(area), Some(street)) => format!("area {}, street {}", area, street),
        (Some(area), None) => format!("area {}", area),
        _ => "unknown location".to_string(),
    };
    format!("{} is {} ({})", d.username, d.status, location)
}

pub async fn run_resident(pool: &PgPool, out: Output, args: ResidentArgs) -> Result<()> {
    match args.command {
        ResidentCommand::Create {
            username,
            password,
            area_id,
            street_id,
            house_number,
        } => {
            let created = resident::create_resident(
                pool,
                NewResident {
                    username,
                    password,
                    area_id,
                    street_id,
                    house_number,
                },
            )
            .await?;
            out.one(&created, resident_line)
        }
        ResidentCommand::Act(action) => {
            let username = args
                .acting_as
                .context("This command needs --as <username>.")?;
            let me = acting_user(pool, &username, UserRole::Resident).await?;
            run_action(pool, out, me.id, action).await
        }
    }
}

async fn run_action(pool: &PgPool, out: Output, me: i64, action: ResidentAction) -> Result<()> {
    match action {
        ResidentAction::Drives => {
            out.many(&resident::street_drives(pool, me).await?, street_drive_line)
        }
        ResidentAction::RequestStop { drive_id } => {
            out.one(&resident::request_stop(pool, me, drive_id).await?, stop_line)
        }
        ResidentAction::CancelStop { drive_id } => {
            resident::cancel_stop(pool, me, drive_id).await?;
            out.message(&format!("Stop request for drive #{} cancelled.", drive_id))
        }
        ResidentAction::Inbox => out.many(&notify::inbox(pool, me).await?, String::clone),
        ResidentAction::Driver { driver_id } => out.one(
            &resident::view_driver_stats(pool, driver_id).await?,
            driver_line,
        ),
        ResidentAction::Stock { driver_id } => {
            out.many(&resident::view_stock(pool, driver_id).await?, stock_line)
        }
    }
}
