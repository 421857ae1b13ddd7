//! Standalone runner for the ledger schema.
//!
//! `HISOB_DATABASE_URL` selects the store; the default is the local SQLite file.

use migration::Migrator;
use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_URL: &str = "sqlite:./hisob.db?mode=rwc";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let action = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let url = std::env::var("HISOB_DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let db = Database::connect(&url).await?;

    match action.as_str() {
        "up" => Migrator::up(&db, None).await?,
        "down" => Migrator::down(&db, Some(1)).await?,
        "reset" => Migrator::reset(&db).await?,
        "status" => Migrator::status(&db).await?,
        other => {
            eprintln!("unknown action {other:?}; expected one of: up, down, reset, status");
            std::process::exit(2);
        }
    }

    Ok(())
}
