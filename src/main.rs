use std::sync::Arc;

use clap::Parser;

use threatdesk::app_data::AppData;
use threatdesk::cli::{self, Cli, Commands};
use threatdesk::config::{BootstrapSettings, LoggingConfig, init_database, init_logging, migrate_database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&LoggingConfig::from_env())?;

    let settings = BootstrapSettings::from_env()?;
    let db = init_database(&settings).await?;

    if matches!(cli.command, Commands::Migrate) {
        return cli::migrate::run_migrations(&db).await;
    }

    // Every other command needs the schema in place
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db).await?);
    cli::execute_command(cli, app_data).await
}
