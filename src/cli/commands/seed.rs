use anyhow::Result;
use tracing::info;

use super::initdb::run_migrations;
use crate::config::AppConfig;

/// Migrates the database, then inserts the demo data if it is empty.
pub async fn seed(config: &AppConfig) -> Result<()> {
    let db = config.connect().await?;
    run_migrations(&db).await?;

    if service::seed_database(&db, &config.hasher(), service::now()).await? {
        info!("Demo data inserted; log in as `admin` or `jsmith` with password `password`");
    } else {
        info!("Database already contains users; nothing seeded");
    }
    Ok(())
}
