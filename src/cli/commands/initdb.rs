use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info};

use crate::config::AppConfig;

/// Applies every pending migration on an open connection.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    info!("Running database migrations");
    match Migrator::up(db, None).await {
        Ok(()) => {
            info!("Database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            Err(e.into())
        }
    }
}

pub async fn init_database(config: &AppConfig) -> Result<()> {
    info!("Initializing database");
    debug!("Database URL: {}", config.database_url);

    let db = config.connect().await?;
    run_migrations(&db).await?;

    info!("Database initialization completed successfully!");
    Ok(())
}
