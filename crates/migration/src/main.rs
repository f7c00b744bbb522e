//! Schema maintenance for the Vasool database.
//!
//! ```text
//! migration [up|down|fresh|status]
//! ```
//!
//! The target is read from `VASOOL_DATABASE_URL`, then `DATABASE_URL`, and
//! defaults to `vasool.db` in the working directory, created on demand.

use migration::Migrator;
use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_URL: &str = "sqlite:./vasool.db?mode=rwc";

enum Action {
    Up,
    Down,
    Fresh,
    Status,
}

impl Action {
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.unwrap_or("up") {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "fresh" => Some(Self::Fresh),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

fn database_url() -> String {
    ["VASOOL_DATABASE_URL", "DATABASE_URL"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let raw = std::env::args().nth(1);
    let Some(action) = Action::parse(raw.as_deref()) else {
        eprintln!("usage: migration [up|down|fresh|status]");
        std::process::exit(2);
    };

    let db = Database::connect(database_url()).await?;
    match action {
        Action::Up => Migrator::up(&db, None).await?,
        // Only the most recent migration.
        Action::Down => Migrator::down(&db, Some(1)).await?,
        Action::Fresh => Migrator::fresh(&db).await?,
        Action::Status => Migrator::status(&db).await?,
    }

    Ok(())
}
