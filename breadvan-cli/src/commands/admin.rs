//! Admin commands: geography, catalog and accounts

use anyhow::Result;
use breadvan_shared::{
    models::{
        area::Area,
        driver::Driver,
        item::{CreateItem, Item},
        resident::Resident,
        street::Street,
    },
    services::{admin, resident::NewResident},
};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::Output;

#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Service areas
    Areas {
        #[command(subcommand)]
        action: AreaAction,
    },
    /// Streets inside areas
    Streets {
        #[command(subcommand)]
        action: StreetAction,
    },
    /// Catalog items
    Items {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Driver accounts
    Drivers {
        #[command(subcommand)]
        action: DriverAction,
    },
    /// Resident accounts
    Residents {
        #[command(subcommand)]
        action: ResidentAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum AreaAction {
    List,
    Add { name: String },
    /// Delete an area and its streets (refused while in use)
    Delete { area_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum StreetAction {
    List {
        /// Only streets in this area
        #[arg(long)]
        area: Option<i64>,
    },
    Add { area_id: i64, name: String },
    Delete { area_id: i64, street_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ItemAction {
    List,
    Add {
        name: String,
        price: Decimal,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    Delete { item_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum DriverAction {
    List,
    Add { username: String, password: String },
    /// Delete a driver with their drives, stock and inbox
    Delete { driver_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ResidentAction {
    List,
    Add {
        username: String,
        password: String,
        area_id: i64,
        street_id: i64,
        house_number: i32,
    },
}

fn area_line(a: &Area) -> String {
    format!("#{} {}", a.id, a.name)
}

fn street_line(s: &Street) -> String {
    format!("#{} {} (area {})", s.id, s.name, s.area_id)
}

fn item_line(i: &Item) -> String {
    let mut line = format!("#{} {} ${}", i.id, i.name, i.price);
    if !i.tags.is_empty() {
        line.push_str(&format!(" [{}]", i.tags.join(", ")));
    }
    if !i.description.is_empty() {
        line.push_str(&format!(" - {}", i.description));
    }
    line
}

fn driver_line(d: &Driver) -> String {
    format!("#{} {} {}", d.id, d.username, d.status)
}

pub(crate) fn resident_line(r: &Resident) -> String {
    format!(
        "#{} {} house {} (area {}, street {})",
        r.id, r.username, r.house_number, r.area_id, r.street_id
    )
}

pub async fn run_admin(pool: &PgPool, out: Output, args: AdminArgs) -> Result<()> {
    match args.command {
        AdminCommand::Areas { action } => match action {
            AreaAction::List => out.many(&admin::list_areas(pool).await?, area_line),
            AreaAction::Add { name } => out.one(&admin::add_area(pool, &name).await?, area_line),
            AreaAction::Delete { area_id } => {
                admin::delete_area(pool, area_id).await?;
                out.message(&format!("Area #{} deleted.", area_id))
            }
        },
        AdminCommand::Streets { action } => match action {
            StreetAction::List { area } => {
                out.many(&admin::list_streets(pool, area).await?, street_line)
            }
            StreetAction::Add { area_id, name } => {
                out.one(&admin::add_street(pool, area_id, &name).await?, street_line)
            }
            StreetAction::Delete { area_id, street_id } => {
                admin::delete_street(pool, area_id, street_id).await?;
                out.message(&format!("Street #{} deleted.", street_id))
            }
        },
        AdminCommand::Items { action } => match action {
            ItemAction::List => out.many(&admin::list_items(pool).await?, item_line),
            ItemAction::Add {
                name,
                price,
                description,
                tags,
            } => {
                let item = admin::add_item(
                    pool,
                    CreateItem {
                        name,
                        price,
                        description,
                        tags,
                    },
                )
                .await?;
                out.one(&item, item_line)
            }
            ItemAction::Delete { item_id } => {
                admin::delete_item(pool, item_id).await?;
                out.message(&format!("Item #{} deleted.", item_id))
            }
        },
        AdminCommand::Drivers { action } => match action {
            DriverAction::List => out.many(&admin::list_drivers(pool).await?, driver_line),
            DriverAction::Add { username, password } => {
                out.one(&admin::create_driver(pool, &username, &password).await?, driver_line)
            }
            DriverAction::Delete { driver_id } => {
                admin::delete_driver(pool, driver_id).await?;
                out.message(&format!("Driver #{} deleted.", driver_id))
            }
        },
        AdminCommand::Residents { action } => match action {
            ResidentAction::List => out.many(&admin::list_residents(pool).await?, resident_line),
            ResidentAction::Add {
                username,
                password,
                area_id,
                street_id,
                house_number,
            } => {
                let created = admin::create_resident(
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
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_item_line_includes_tags_and_description() {
        let item = Item {
            id: 2,
            name: "Coconut Roll".to_string(),
            price: Decimal::new(850, 2),
            description: "Sweet".to_string(),
            tags: vec!["sweet".to_string(), "pastry".to_string()],
            created_at: Utc::now(),
        };

        assert_eq!(item_line(&item), "#2 Coconut Roll $8.50 [sweet, pastry] - Sweet");
    }

    #[test]
    fn test_item_line_minimal() {
        let item = Item {
            id: 1,
            name: "Hops".to_string(),
            price: Decimal::new(1, 0),
            description: String::new(),
            tags: vec![],
            created_at: Utc::now(),
        };

        assert_eq!(item_line(&item), "#1 Hops $1");
    }
}
