//! Driver commands, run as the driver named by `--as`

use anyhow::{bail, Result};
use breadvan_shared::{
    models::{
        drive::Drive,
        stock::DriverStock,
        stop::{Stop, StopDetails},
        user::UserRole,
    },
    schedule::format_time,
    services::{driver, notify},
};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{acting_user, drive_line, stock_line, Output};

#[derive(Parser, Debug)]
pub struct DriverArgs {
    /// Driver to act as
    #[arg(long = "as", value_name = "USERNAME")]
    pub acting_as: String,

    #[command(subcommand)]
    pub command: DriverCommand,
}

#[derive(Subcommand, Debug)]
pub enum DriverCommand {
    /// Schedule a drive to a street (date YYYY-MM-DD, time HH:MM)
    Schedule {
        area_id: i64,
        street_id: i64,
        date: String,
        time: String,
    },
    /// Cancel an upcoming drive
    Cancel { drive_id: i64 },
    /// Start an upcoming drive
    Start { drive_id: i64 },
    /// Complete the drive in progress
    End,
    /// Upcoming and in-progress drives
    Drives,
    /// Stop requests on a drive
    Stops { drive_id: i64 },
    /// Approve a pending stop
    Approve {
        stop_id: i64,
        #[arg(long)]
        eta: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Reject a pending stop
    Reject {
        stop_id: i64,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Send an ETA or status update to a resident on a drive
    Update {
        drive_id: i64,
        resident_id: i64,
        #[arg(long)]
        eta: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Current stock
    Stock,
    /// Set the quantity of an item, by catalog id or by name
    SetStock {
        quantity: i32,
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        item: Option<i64>,
        /// Creates the catalog item if it does not exist
        #[arg(long)]
        name: Option<String>,
        #[arg(long, requires = "name")]
        price: Option<Decimal>,
    },
    /// Remove a stock entry
    RemoveStock { stock_id: i64 },
    /// Notifications, oldest first
    Inbox,
}

fn drive_row(d: &Drive) -> String {
    format!(
        "Drive #{} on {} at {} is now {}.",
        d.id,
        d.scheduled_date,
        format_time(d.scheduled_time),
        d.status
    )
}

fn stop_row(s: &Stop) -> String {
    format!(
        "Stop #{} on drive #{} (resident {}) is {}{}{}",
        s.id,
        s.drive_id,
        s.resident_id,
        s.status,
        s.eta.as_deref().map(|e| format!(", ETA {}", e)).unwrap_or_default(),
        s.status_message
            .as_deref()
            .map(|m| format!(", {}", m))
            .unwrap_or_default()
    )
}

fn stop_details_row(s: &StopDetails) -> String {
    format!(
        "#{} {} (resident {}) house {} [{}]{}",
        s.id,
        s.resident_username,
        s.resident_id,
        s.house_number,
        s.status,
        s.eta.as_deref().map(|e| format!(" ETA {}", e)).unwrap_or_default()
    )
}

fn stock_row(s: &DriverStock) -> String {
    format!("Item {} set to {}.", s.item_id, s.quantity)
}

pub async fn run_driver(pool: &PgPool, out: Output, args: DriverArgs) -> Result<()> {
    let me = acting_user(pool, &args.acting_as, UserRole::Driver).await?;

    match args.command {
        DriverCommand::Schedule {
            area_id,
            street_id,
            date,
            time,
        } => {
            let drive =
                driver::schedule_drive(pool, me.id, area_id, street_id, &date, &time).await?;
            out.one(&drive, drive_line)
        }
        DriverCommand::Cancel { drive_id } => {
            out.one(&driver::cancel_drive(pool, me.id, drive_id).await?, drive_row)
        }
        DriverCommand::Start { drive_id } => {
            out.one(&driver::start_drive(pool, me.id, drive_id).await?, drive_row)
        }
        DriverCommand::End => out.one(&driver::end_drive(pool, me.id).await?, drive_row),
        DriverCommand::Drives => out.many(&driver::view_drives(pool, me.id).await?, drive_line),
        DriverCommand::Stops { drive_id } => out.many(
            &driver::view_requested_stops(pool, me.id, drive_id).await?,
            stop_details_row,
        ),
        DriverCommand::Approve {
            stop_id,
            eta,
            status,
        } => {
            let stop =
                driver::approve_stop(pool, me.id, stop_id, eta.as_deref(), status.as_deref())
                    .await?;
            out.one(&stop, stop_row)
        }
        DriverCommand::Reject { stop_id, reason } => {
            let stop = driver::reject_stop(pool, me.id, stop_id, reason.as_deref()).await?;
            out.one(&stop, stop_row)
        }
        DriverCommand::Update {
            drive_id,
            resident_id,
            eta,
            status,
        } => {
            let stop = driver::send_stop_update(
                pool,
                me.id,
                resident_id,
                drive_id,
                eta.as_deref(),
                status.as_deref(),
            )
            .await?;
            out.one(&stop, stop_row)
        }
        DriverCommand::Stock => out.many(&driver::view_stock(pool, me.id).await?, stock_line),
        DriverCommand::SetStock {
            quantity,
            item,
            name,
            price,
        } => {
            let stock = match (item, name) {
                (Some(item_id), _) => driver::update_stock(pool, me.id, item_id, quantity).await?,
                (None, Some(name)) => {
                    driver::add_stock_by_name(pool, me.id, &name, price, quantity).await?
                }
                (None, None) => bail!("Either --item or --name is required."),
            };
            out.one(&stock, stock_row)
        }
        DriverCommand::RemoveStock { stock_id } => {
            driver::remove_stock(pool, me.id, stock_id).await?;
            out.message("Item removed from your menu.")
        }
        DriverCommand::Inbox => {
            out.many(&notify::inbox(pool, me.id).await?, String::clone)
        }
    }
}
