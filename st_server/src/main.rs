//! Tournament server: JSON API over an in-memory or PostgreSQL store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use shuttle_tourney::{
    TournamentManager,
    db::{Database, InMemoryTournamentRepository, TournamentRepository},
};
use st_server::{
    api,
    config::{ConfigOverrides, ServerConfig, StorageBackend},
    demo, logging, metrics,
};
use tracing::{error, info, warn};

const HELP: &str = "\
Run the shuttle tourney server

USAGE:
  st_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]
  --storage    BACKEND     memory | postgres           [default: env STORAGE_BACKEND or memory]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  STORAGE_BACKEND          memory | postgres
  DATABASE_URL             PostgreSQL connection string
  DB_MAX_CONNECTIONS       Pool size                 [default: 10]
  DB_QUERY_TIMEOUT_SECS    Per-query deadline        [default: 5]
  METRICS_BIND             Prometheus exporter address, disabled when unset
  SEED_DEMO_DATA           Load a demo tournament    [default: false]
  RUST_LOG                 Log filter                [default: info,sqlx=warn,hyper=warn]
";

fn parse_overrides(mut pargs: Arguments) -> Result<ConfigOverrides, Error> {
    Ok(ConfigOverrides {
        bind: pargs
            .opt_value_from_str::<_, SocketAddr>("--bind")
            .context("Invalid --bind address")?,
        database_url: pargs
            .opt_value_from_str("--db-url")
            .context("Invalid --db-url")?,
        storage: pargs
            .opt_value_from_str::<_, StorageBackend>("--storage")
            .context("Invalid --storage backend")?,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let config = ServerConfig::from_env(parse_overrides(pargs)?)?;
    config.validate()?;

    logging::init().map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    info!("Starting tournament server at {}", config.bind);

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics at http://{}/metrics", metrics_bind);
    }

    let (repository, database): (Arc<dyn TournamentRepository>, Option<Database>) =
        match config.storage {
            StorageBackend::Memory => {
                warn!("Using in-memory storage; data is lost on restart");
                (
                    Arc::new(InMemoryTournamentRepository::new()) as Arc<dyn TournamentRepository>,
                    None,
                )
            }
            StorageBackend::Postgres => {
                let db = Database::new(&config.database)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
                db.migrate()
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
                info!("Database connected and migrated");
                let repository: Arc<dyn TournamentRepository> =
                    Arc::new(db.tournament_repository());
                (repository, Some(db))
            }
        };

    let manager = TournamentManager::new(repository);

    if config.seed_demo_data {
        match demo::seed(&manager).await {
            Ok(tournament) => info!("Demo tournament '{}' ready", tournament.name),
            Err(e) => error!("Failed to load demo data: {}", e),
        }
    }

    let app = api::create_router(api::AppState { manager });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
