use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::DbConfig;
use core_types::Backend;
use database::{Database, DbError, Repository, run_retention};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// The main entry point for the Statushub monitoring service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment overrides (e.g. POSTGRES_SSLMODE) from .env if present.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run => run(&cli.dir).await,
        Commands::Setup(args) => setup(args, &cli.dir).await,
        Commands::Reset => reset(&cli.dir).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A self-hosted uptime monitoring service.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory holding config.yml and the embedded database file.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the service: connect (retrying), migrate and monitor.
    Run,
    /// First-time setup: write config.yml and create the schema.
    Setup(SetupArgs),
    /// Drop and re-create the whole schema.
    Reset,
}

#[derive(Parser)]
struct SetupArgs {
    #[arg(long, default_value = "Statushub")]
    project: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, default_value = "")]
    domain: String,

    /// Database backend: sqlite, mysql, postgres or mssql.
    #[arg(long, default_value = "sqlite")]
    backend: Backend,

    #[arg(long, default_value = "localhost")]
    host: String,

    /// 0 selects the backend's default port.
    #[arg(long, default_value_t = 0)]
    port: u16,

    #[arg(long, default_value = "")]
    user: String,

    #[arg(long, default_value = "")]
    password: String,

    #[arg(long, default_value = "")]
    database: String,

    /// Display timezone as a UTC offset in hours (e.g. -7 or 5.5).
    #[arg(long, default_value_t = 0.0)]
    timezone: f32,
}

// ==============================================================================
// Startup Flows
// ==============================================================================

/// Normal service startup: the schema must be fully migrated before anything
/// reads or writes entities, so migration runs to completion (or fails
/// fatally) before the retention task starts.
async fn run(dir: &Path) -> anyhow::Result<()> {
    let config = configuration::load_config(dir)
        .context("could not load config.yml; run `statushub setup` first")?;

    let mut db = Database::new(&config);
    db.connect(&config, true, dir).await?;
    db.migrate_schema().await?;

    let repo = Repository::new(db.session()?, db.backend(), config.timezone);
    let settings = match repo.select_core_settings().await {
        Ok(settings) => settings,
        // The row can be absent after a restore or manual wipe; re-create it.
        Err(DbError::NotFound) => repo.insert_core_settings(&config).await?,
        Err(err) => return Err(err.into()),
    };
    tracing::info!(
        "'{}' is ready (migration marker {})",
        settings.name,
        settings.migration_id
    );

    let retention = tokio::spawn(run_retention(db.session()?, db.backend()));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    retention.abort();
    db.close().await;
    Ok(())
}

async fn setup(args: SetupArgs, dir: &Path) -> anyhow::Result<()> {
    let mut config = DbConfig {
        project: args.project,
        description: args.description,
        domain: args.domain,
        backend: args.backend,
        host: args.host,
        port: args.port,
        user: args.user,
        password: args.password,
        database: args.database,
        api_key: String::new(),
        api_secret: String::new(),
        timezone: args.timezone,
    };
    let saved = configuration::save(&mut config, dir)?;

    let mut db = Database::new(&saved);
    db.connect(&saved, false, dir).await?;
    db.create_schema().await?;

    let repo = Repository::new(db.session()?, db.backend(), saved.timezone);
    let settings = repo.insert_core_settings(&saved).await?;
    tracing::info!("'{}' created; API key: {}", settings.name, saved.api_key);

    db.close().await;
    Ok(())
}

async fn reset(dir: &Path) -> anyhow::Result<()> {
    let config = configuration::load_config(dir)?;

    let mut db = Database::new(&config);
    db.connect(&config, false, dir).await?;
    db.drop_schema().await?;
    db.create_schema().await?;

    let repo = Repository::new(db.session()?, db.backend(), config.timezone);
    repo.insert_core_settings(&config).await?;
    tracing::info!("Database reset complete");

    db.close().await;
    Ok(())
}
