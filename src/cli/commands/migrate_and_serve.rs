use anyhow::Result;
use tracing::info;

use super::initdb::run_migrations;
use super::serve::run_server;
use crate::config::{build_app_state, AppConfig, ServerConfig};

pub async fn migrate_and_serve(config: &AppConfig, server: &ServerConfig) -> Result<()> {
    info!("Applying database migrations and starting server");

    let db = config.connect().await?;
    run_migrations(&db).await?;

    run_server(build_app_state(db, config), &server.bind_address).await
}
