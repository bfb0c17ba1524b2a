//! QuinielaDB - command line access to stored pool results

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quiniela_db::config::{DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_FILE};
use quiniela_db::{seed, storage, DataAccessError, Database};

/// QuinielaDB - 1-X-2 football pool results
#[derive(Parser, Debug)]
#[command(name = "quiniela-db")]
#[command(about = "Store and list 1-X-2 football pool results")]
struct Args {
    /// Configuration file (default: user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file used when a new configuration is generated
    #[arg(short, long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill the database with a random round
    Seed,
    /// Print every stored result
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete every stored result
    Clear {
        /// Reclaim file space afterwards
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => storage::get_config_dir()?.join(DEFAULT_CONFIG_FILE),
    };
    let database_path = match args.database {
        Some(path) => path,
        None => storage::get_data_dir()?.join(DEFAULT_DATABASE_FILE),
    };

    let mut db = Database::new(&config_path, &database_path);
    db.open().context("Could not open database")?;

    let outcome = run(&mut db, args.command);
    finish(outcome, db.close())
}

/// Combine a command's result with the close that follows it, reporting the
/// command's error first
fn finish(outcome: Result<()>, closed: Result<(), DataAccessError>) -> Result<()> {
    outcome?;
    closed.context("Could not close database")
}

fn run(db: &mut Database, command: Command) -> Result<()> {
    match command {
        Command::Seed => {
            let round = seed::generate(&mut rand::thread_rng())?;
            for m in &round {
                println!("{}", m);
            }
            let rows = db.write_batch(&round)?;
            info!("Inserted {} results", rows);
        }
        Command::List { json } => {
            let mut results = Vec::new();
            db.read(&mut results)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for m in &results {
                    println!("{}", m);
                }
            }
        }
        Command::Clear { compact } => {
            let rows = db.clear()?;
            info!("Deleted {} results", rows);
            if compact {
                db.compact()?;
            }
        }
    }
    Ok(())
}
