use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::migrate::MigrateDatabase;

/// cruxplan - climbing training periodization and weekly planning
#[derive(Parser)]
#[command(name = "cruxplan")]
#[command(about = "Personal climbing-training planner backend", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop the database and recreate it with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cruxplan::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    cruxplan::observability::init_observability(
        "cruxplan",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    );

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: cruxplan::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting cruxplan server...");

    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    migrate_command_inner(&config).await?;
    cruxplan::server::serve(&config, &host, port).await
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: cruxplan::Config) -> Result<()> {
    tracing::info!("Running database migrations...");
    migrate_command_inner(&config).await?;
    tracing::info!("Migrations completed successfully");
    Ok(())
}

async fn migrate_command_inner(config: &cruxplan::Config) -> Result<()> {
    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }
    let pool = cruxplan::db::create_pool(&config.database.url, 1).await?;
    cruxplan::db::run_migrations(&pool).await?;
    pool.close().await;
    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: cruxplan::Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await
}
