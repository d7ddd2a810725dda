use std::process::ExitCode;

use dotenvy::dotenv;

use activities::config::AppConfig;
use activities::database::{connection, schema};
use activities::error::StartupError;
use activities::logging;
use activities::services::seed_service::{self, SeedReport};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    logging::init_tracing();

    match seed().await {
        Ok(report) if report.seeded => {
            println!(
                "seeded database: activities={}, participants={}",
                report.activities, report.participants
            );
            ExitCode::SUCCESS
        }
        Ok(_) => {
            println!("database already seeded");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("seeding failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn seed() -> Result<SeedReport, StartupError> {
    let config = AppConfig::from_env()?;
    let pool = connection::create_pool(&config.database_url).await?;
    schema::ensure_schema(&pool).await?;
    let report = seed_service::seed_if_empty(&pool).await?;
    pool.close().await;
    Ok(report)
}
