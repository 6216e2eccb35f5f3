use database::{
    StoreResult,
    db::{close_connection, create_connection, run_migrations},
    services::seed::SeedService,
};
use log::{error, info};
use std::process::ExitCode;

/// Connects, migrates and loads the sample data set
async fn run() -> StoreResult<()> {
    let db = create_connection().await?;
    run_migrations(&db).await?;

    let seeded = SeedService::seed_sample_data(&db).await;
    close_connection(db).await?;

    if seeded? {
        info!("Seed finished");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Seeding failed: {e}");
            ExitCode::FAILURE
        }
    }
}
