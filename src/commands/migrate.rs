use crate::Config;
use crate::database::migration::Migrator;
use crate::database::{DatabaseManager, DatabaseManagerImpl};
use clap::Subcommand;
use sea_orm_migration::MigratorTrait;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run all pending migrations
    Up,
    /// Rollback the last migration
    Down {
        #[arg(
            short,
            long,
            help = "Number of migrations to rollback",
            default_value = "1"
        )]
        steps: u32,
    },
    /// Show migration status
    Status,
}

pub async fn handle_migrate_command(
    action: MigrateAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let db_manager = DatabaseManagerImpl::new_from_config(config).await?;
    let connection = db_manager.connection();

    match action {
        MigrateAction::Up => {
            info!("Running pending migrations...");
            Migrator::up(connection, None).await?;
            info!("All migrations completed successfully");
        }
        MigrateAction::Down { steps } => {
            info!("Rolling back {} migration(s)...", steps);
            Migrator::down(connection, Some(steps)).await?;
            info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            info!("Checking migration status...");
            Migrator::status(connection).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.database.url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("lab.db").display()
        );
        config
    }

    #[tokio::test]
    async fn test_migrate_up_then_down() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);

        handle_migrate_command(MigrateAction::Up, &config)
            .await
            .unwrap();
        handle_migrate_command(MigrateAction::Status, &config)
            .await
            .unwrap();
        handle_migrate_command(MigrateAction::Down { steps: 4 }, &config)
            .await
            .unwrap();

        let db_manager = DatabaseManagerImpl::new_from_config(&config).await.unwrap();
        let applied = Migrator::get_applied_migrations(db_manager.connection())
            .await
            .unwrap();
        assert!(applied.is_empty());
    }
}
