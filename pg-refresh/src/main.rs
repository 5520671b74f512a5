//! pg-refresh - Main entry point
//!
//! Lists remote Postgres backups and restores one into a local database.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pg_refresh::exec::ProcessRunner;
use pg_refresh::restore::DatabaseStatus;
use pg_refresh::transfer::progress::{format_bytes, format_duration};
use pg_refresh::{
    utils, Config, ConsoleObserver, PipelineObserver, Refresher, SelectionCriteria,
    TracingObserver,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read when present in the working directory and no --config is given
const DEFAULT_CONFIG_FILE: &str = "pg-refresh.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Remote application whose backups are used (overrides config)
    #[arg(short, long, global = true)]
    app: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log stage progress instead of printing it
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available backups, first listed is the default choice
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a backup and restore it into the local database
    Import {
        /// Backup id to import
        #[arg(long)]
        id: Option<String>,

        /// Import the first backup taken on this day
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,

        /// Target database (overrides config)
        #[arg(short, long)]
        database: Option<String>,
    },

    /// Create the local database
    CreateDb {
        #[arg(short, long)]
        database: Option<String>,
    },

    /// Drop the local database
    DropDb {
        #[arg(short, long)]
        database: Option<String>,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Config::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Config::default(),
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = load_config(args.config.as_deref())?;
    if let Some(app) = args.app {
        config.remote.app = app;
    }

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    let observer: Arc<dyn PipelineObserver> = if args.quiet {
        Arc::new(TracingObserver)
    } else {
        Arc::new(ConsoleObserver::new())
    };
    let refresher = Refresher::new(&config, Arc::new(ProcessRunner), observer);

    match args.command {
        Command::List { json } => {
            config.validate_remote()?;
            let backups = refresher.list_backups().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
            } else if backups.is_empty() {
                println!("No backups found for {}", config.remote.app);
            } else {
                for backup in &backups {
                    println!("{}", backup);
                }
            }
        }
        Command::Import { id, date, database } => {
            let database = config.target_database(database)?;
            config.validate_remote()?;
            let summary = refresher
                .import_backup(&SelectionCriteria { id, date }, &database)
                .await?;
            println!(
                "Imported backup {} into {} ({} in {})",
                summary.backup,
                summary.database,
                format_bytes(summary.bytes_downloaded),
                format_duration(summary.elapsed)
            );
        }
        Command::CreateDb { database } => {
            let database = config.target_database(database)?;
            match refresher.create_local_db(&database).await? {
                DatabaseStatus::AlreadyExists => println!("database {} already exists", database),
                _ => println!("database {} is created", database),
            }
        }
        Command::DropDb { database } => {
            let database = config.target_database(database)?;
            match refresher.drop_local_db(&database).await? {
                DatabaseStatus::Missing => println!("database {} does not exist", database),
                _ => println!("database {} is deleted", database),
            }
        }
    }

    Ok(())
}
