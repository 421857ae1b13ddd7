use clap::Parser;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = settings::Args::parse();
    let settings = settings::Settings::new(&args.config)?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "hisob={level},telegram_bot={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let access = settings.telegram.access()?;
    let ledger = settings.ledger.settings()?;
    let schedule = settings.schedule.schedule()?;

    if let Some(server) = settings.server {
        let addr = server.addr()?;
        let engine = engine.clone();
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            server::run(engine, addr).await;
        });
    }

    let mut builder = telegram_bot::Bot::builder()
        .token(&settings.telegram.token)
        .access(access)
        .ledger(ledger)
        .engine(engine);
    match schedule {
        Some(schedule) => {
            tracing::info!("Scheduled report on days {:?} at {}", schedule.days(), schedule.at());
            builder = builder.schedule(schedule);
        }
        None => tracing::info!("Scheduled report disabled"),
    }
    let bot = builder.build()?;
    tasks.spawn(async move { bot.run().await });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
