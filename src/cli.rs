use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use crate::config::{AppConfig, ServerConfig};
use commands::{init_database, migrate_and_serve, seed, serve};

#[derive(Parser)]
#[command(name = "agriconnect")]
#[command(about = "AgriConnect farmer marketplace: web server and database tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        #[command(flatten)]
        config: AppConfig,
        #[command(flatten)]
        server: ServerConfig,
    },
    /// Initialize the database using migrations
    ///
    /// For SQLite the file is created when the URL carries `?mode=rwc`.
    InitDb {
        #[command(flatten)]
        config: AppConfig,
    },
    /// Apply pending migrations, then start the web server
    MigrateAndServe {
        #[command(flatten)]
        config: AppConfig,
        #[command(flatten)]
        server: ServerConfig,
    },
    /// Insert demo accounts, products and messages into an empty database
    ///
    /// Creates the employee `admin` and the farmer `jsmith`, both with the
    /// password `password`. Does nothing when users already exist.
    Seed {
        #[command(flatten)]
        config: AppConfig,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { config, server } => {
                serve(&config, &server).await?;
            }
            Commands::InitDb { config } => {
                init_database(&config).await?;
            }
            Commands::MigrateAndServe { config, server } => {
                migrate_and_serve(&config, &server).await?;
            }
            Commands::Seed { config } => {
                seed(&config).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_arguments() {
        let cli = Cli::try_parse_from([
            "agriconnect",
            "serve",
            "--database-url",
            "sqlite::memory:",
            "--bind-address",
            "127.0.0.1:8080",
            "--bcrypt-cost",
            "6",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve { config, server } => {
                assert_eq!(config.database_url, "sqlite::memory:");
                assert_eq!(config.bcrypt_cost, 6);
                assert_eq!(server.bind_address, "127.0.0.1:8080");
            }
            _ => panic!("Expected serve command"),
        }
    }

    #[test]
    fn test_parse_seed_arguments() {
        let cli = Cli::try_parse_from(["agriconnect", "seed", "-d", "sqlite::memory:"]).unwrap();
        assert!(matches!(cli.command, Commands::Seed { .. }));
    }
}
