use crate::Config;
use crate::database::seed::seed_demo_data;
use crate::database::{DatabaseManager, DatabaseManagerImpl};
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum InitAction {
    /// Initialize database with migrations and optional demo data
    Database {
        #[arg(long, help = "Insert the demo dataset", default_value = "false")]
        seed_demo: bool,
        #[arg(
            long,
            help = "Clear existing data before seeding",
            default_value = "false"
        )]
        force_seed: bool,
    },
}

pub async fn handle_init_command(
    action: InitAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        InitAction::Database {
            seed_demo,
            force_seed,
        } => {
            info!("Initializing database...");

            let db_manager = DatabaseManagerImpl::new_from_config(config).await?;
            db_manager.migrate().await?;
            info!("Database migrations completed");

            if seed_demo {
                let summary = seed_demo_data(&db_manager, force_seed).await?;
                if summary.customers > 0 {
                    info!(
                        customers = summary.customers,
                        products = summary.products,
                        orders = summary.orders,
                        order_items = summary.order_items,
                        "Seeded demo data"
                    );
                } else {
                    info!("Demo data already present (use --force-seed to re-seed)");
                }
            }

            info!("Database initialization completed successfully");
        }
    }

    Ok(())
}
