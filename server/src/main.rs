mod auth;
mod config;
mod employees;
mod http;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use migration::{Migrator, MigratorTrait};
use platform_authn::{JwtAuthenticator, Role, issue_token};
use platform_authz::PolicyEngine;
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use products_hr::{EmployeeStore, InMemoryEmployeeStore, SeaOrmEmployeeStore, seed_demo};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "directory-server", version, about = "Employee directory service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert demo employees into an empty database.
    Seed,
    /// Print a signed bearer token for local use.
    #[command(name = "token:issue")]
    TokenIssue(TokenCommand),
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, value_enum, default_value_t = StoreBackend::Postgres)]
    store: StoreBackend,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

#[derive(Args, Debug)]
struct TokenCommand {
    #[arg(long)]
    subject: String,
    #[arg(long = "role", value_parser = parse_role, default_value = "ADMIN")]
    roles: Vec<Role>,
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::parse(value).ok_or_else(|| format!("unknown role {value} (use ADMIN or USER)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::from_env("directory-server")?)?;
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up().await,
            MigrateCommand::Down => migrate_down().await,
        },
        Command::Seed => run_seed().await,
        Command::TokenIssue(cmd) => issue_dev_token(cmd),
    };
    shutdown_tracing();
    result
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env()?;
    connect(&settings)
        .await
        .context("failed to connect to database")
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = Arc::new(AppConfig::load()?);
    let store: Arc<dyn EmployeeStore> = match cmd.store {
        StoreBackend::Postgres => {
            let pool = setup_pool().await?;
            ensure_migrations(&pool, cmd.allow_dirty).await?;
            Arc::new(SeaOrmEmployeeStore::new(pool))
        }
        StoreBackend::Memory => {
            info!("using in-memory employee store; records are lost on exit");
            Arc::new(InMemoryEmployeeStore::new())
        }
    };
    let state = AppState {
        store,
        authenticator: Arc::new(JwtAuthenticator::new(config.auth.clone())),
        policy: PolicyEngine,
        config,
    };
    http::serve(ServeConfig::new(cmd.host, cmd.port), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `cargo run -p directory-server -- migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down() -> Result<()> {
    let pool = setup_pool().await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}

async fn run_seed() -> Result<()> {
    let pool = setup_pool().await?;
    ensure_migrations(&pool, false).await?;
    let store = SeaOrmEmployeeStore::new(pool);
    let created = seed_demo(&store).await.context("seeding employees failed")?;
    for employee in &created {
        info!(id = %employee.id, name = %employee.name, "seeded employee");
    }
    Ok(())
}

fn issue_dev_token(cmd: TokenCommand) -> Result<()> {
    let config = AppConfig::load()?;
    let token =
        issue_token(&cmd.subject, &cmd.roles, &config.auth).context("failed to sign token")?;
    println!("{token}");
    Ok(())
}
