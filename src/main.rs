use clap::{Parser, Subcommand};
use journey::config::{default_storage_path, STORAGE_PATH_ENV};
use journey::storage::{forget_reports, FileStorage, Storage};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Journey - inspect and maintain the record of one-time migrations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the reports file.
    /// Defaults to ~/.journey/reports.json
    #[arg(short, long, env = STORAGE_PATH_ENV)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every stored report
    List,

    /// Forget every migration ran, without rolling anything back
    Reset,

    /// Forget the given migrations so they run again next time
    Forget {
        /// Migration ids to forget
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let path = match args.storage {
        Some(path) => path,
        None => default_storage_path()?,
    };
    let storage = FileStorage::new(path);

    match args.command {
        Command::List => {
            let reports = storage.get_all().await?;
            if reports.is_empty() {
                info!(path = %storage.path().display(), "No migrations recorded");
            }
            for report in reports {
                let status = if report.succeeded() { "ok" } else { "failed" };
                match report.error_message() {
                    Some(message) => println!(
                        "{}  {}  {}  {}",
                        report.migration_id(),
                        status,
                        report.executed_at(),
                        message
                    ),
                    None => println!(
                        "{}  {}  {}",
                        report.migration_id(),
                        status,
                        report.executed_at()
                    ),
                }
            }
        }
        Command::Reset => {
            storage.clear().await?;
            info!(path = %storage.path().display(), "Cleared all migration records");
        }
        Command::Forget { ids } => {
            let summary = forget_reports(&storage, &ids).await?;
            for id in &summary.unknown {
                warn!(id = %id, "No record for migration");
            }
            info!(removed = summary.removed.len(), "Forgot migration records");
        }
    }

    Ok(())
}
