use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use pinreset::config::Config;
use pinreset::reset::sweep::{self, SweepOptions, DEFAULT_BATCH_SIZE};
use pinreset::store::PgResetStore;

/// Remove expired PIN resets from the database.
#[derive(Parser, Debug)]
#[command(name = "pinreset-sweep", version)]
struct Args {
    /// Report how many resets would be removed without deleting anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Maximum number of resets deleted per transaction
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    let Some(database_url) = config.database_url else {
        tracing::error!("DATABASE_URL not set. Exiting.");
        return ExitCode::FAILURE;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect to database: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store = PgResetStore::new(pool);
    let options = SweepOptions {
        dry_run: args.dry_run,
        batch_size: args.batch_size,
    };

    tracing::info!("Scanning for expired PIN resets (dry_run={})", args.dry_run);
    let result = sweep::run(&store, Utc::now(), options).await;
    store.pool().close().await;

    match result {
        Ok(report) => {
            println!("expired={} deleted={}", report.expired, report.deleted);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Sweep failed: {e}");
            ExitCode::FAILURE
        }
    }
}
