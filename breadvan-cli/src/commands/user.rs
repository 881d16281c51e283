//! Account commands shared by every role

use anyhow::Result;
use breadvan_shared::{
    models::user::{User, UserRole},
    services::user,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use sqlx::PgPool;

use super::Output;

#[derive(Parser, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create an admin account (drivers and residents: see `admin drivers add`, `resident create`)
    Create { username: String, password: String },
    /// List all accounts
    List,
    /// Check credentials and print a token pair
    Login {
        username: String,
        password: String,
        /// Secret used to sign the tokens
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        jwt_secret: String,
    },
    /// Mark a user logged out (drivers go offline)
    Logout { username: String },
    /// Change a username
    Rename { username: String, new_username: String },
}

fn user_line(u: &User) -> String {
    format!(
        "#{} {} ({}){}",
        u.id,
        u.username,
        u.role.as_str(),
        if u.logged_in { " logged in" } else { "" }
    )
}

pub async fn run_user(pool: &PgPool, out: Output, args: UserArgs) -> Result<()> {
    match args.command {
        UserCommand::Create { username, password } => {
            let created = user::create_user(pool, &username, &password, UserRole::Admin).await?;
            out.one(&created, user_line)
        }
        UserCommand::List => out.many(&user::list_users(pool).await?, user_line),
        UserCommand::Login {
            username,
            password,
            jwt_secret,
        } => {
            let (logged_in, tokens) = user::login(pool, &username, &password, &jwt_secret).await?;
            let value = json!({ "user": logged_in, "tokens": tokens });
            out.one(&value, |_| {
                format!(
                    "{} logged in as {}\naccess_token: {}\nrefresh_token: {}",
                    logged_in.username, logged_in.role, tokens.access_token, tokens.refresh_token
                )
            })
        }
        UserCommand::Logout { username } => {
            let found = user::get_user_by_username(pool, &username).await?;
            let logged_out = user::logout(pool, found.id).await?;
            out.message(&format!("{} logged out.", logged_out.username))
        }
        UserCommand::Rename {
            username,
            new_username,
        } => {
            let found = user::get_user_by_username(pool, &username).await?;
            let renamed = user::update_username(pool, found.id, &new_username).await?;
            out.one(&renamed, user_line)
        }
    }
}
