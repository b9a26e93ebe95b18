// CLI module for administrative and session operations

pub mod accounts;
pub mod migrate;
pub mod session;

use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::types::db::UserRole;

/// Threatdesk CLI
#[derive(Parser)]
#[command(name = "threatdesk")]
#[command(about = "Security incident tracking core", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Create an account
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// One of: Administrator, "Security Supervisor", "Security Officer", "Compliance Auditor"
        #[arg(long, value_parser = parse_role)]
        role: UserRole,

        /// Prompted for when omitted
        #[arg(long, env = "THREATDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Disable login for an account
    Deactivate {
        #[arg(long)]
        username: String,
    },

    /// Authenticate and print a session token
    Login {
        #[arg(long)]
        username: String,

        #[arg(long, env = "THREATDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the account behind a session token
    Whoami {
        #[arg(long, env = "THREATDESK_TOKEN", hide_env_values = true)]
        token: String,
    },
}

fn parse_role(value: &str) -> Result<UserRole, String> {
    value.parse::<UserRole>().map_err(|e| e.to_string())
}

/// Execute CLI command
///
/// `Migrate` is handled by `migrate::run_migrations` before `AppData`
/// exists; it is accepted here as a no-op so callers can route every
/// command through one entry point.
pub async fn execute_command(cli: Cli, app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => {}
        Commands::CreateUser {
            username,
            email,
            role,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => prompt_for_password(&username)?,
            };
            accounts::create_user(&app_data, &username, &email, role, &password).await?;
        }
        Commands::Deactivate { username } => {
            accounts::deactivate_user(&app_data, &username).await?;
        }
        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_for_password(&username)?,
            };
            session::login(&app_data, &username, &password).await?;
        }
        Commands::Whoami { token } => {
            session::whoami(&app_data, &token).await?;
        }
    }

    Ok(())
}

fn prompt_for_password(username: &str) -> Result<String, Box<dyn std::error::Error>> {
    print!("Password for {}: ", username);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let password = input.trim_end_matches(['\r', '\n']).to_string();

    if password.is_empty() {
        return Err("Password must not be empty".into());
    }
    Ok(password)
}
