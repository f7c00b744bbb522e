use clap::Parser;
use migration::{Migrator, MigratorTrait};

mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "vasool={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = match open_database(&settings.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err.into());
        }
    };

    let engine = engine::Engine::builder().database(db).build().await?;

    let acting = cli.acting_member.or(settings.member);
    if let Err(err) = commands::run(&engine, cli.command, acting.as_deref()).await {
        tracing::error!("{err}");
        return Err(err.into());
    }

    Ok(())
}

async fn open_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, error::AppError> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
