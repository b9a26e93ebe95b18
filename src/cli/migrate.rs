use sea_orm::DatabaseConnection;

use crate::config::migrate_database;

/// Run database migrations
///
/// Does not initialize the full AppData structure, so it works before a
/// signing secret is configured.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    migrate_database(db).await?;

    tracing::info!("All migrations completed successfully");
    println!("✓ Database is up to date");

    Ok(())
}
