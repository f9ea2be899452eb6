// regline/src/main.rs

use clap::Parser;
use std::path::PathBuf;

// Infrastructure (Config & Adapters)
use regline_core::infrastructure::adapters::duckdb::DuckDbStore;
use regline_core::infrastructure::config::{load_catalog, load_project_config};
use regline_core::infrastructure::csv::CsvTableReader;
use regline_core::infrastructure::fs::FsDirectoryLister;

// Domain + Application (Use Case)
use regline_core::application::run_pipeline;
use regline_core::domain::catalog;

#[derive(Parser)]
#[command(name = "regline")]
#[command(about = "Batch ETL orchestrator for regulatory CSV extracts", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory (holds regline.yaml, imports/ and scripts/)
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Setup Logging (Tracing)
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let config = load_project_config(&cli.project_dir)?;
    println!("   Project: {}", config.name);

    // B. Catalog: file override if configured, otherwise the builtin one.
    let catalog = match &config.catalog {
        Some(path) => load_catalog(&cli.project_dir.join(path))?,
        None => catalog::builtin(),
    };

    // C. Instantiate the DB Adapter (DuckDB).
    // The handle is opened here and injected: its lifecycle belongs to the
    // caller of the orchestrator, never to a module-level singleton.
    let db_path = if config.database == ":memory:" {
        config.database.clone()
    } else {
        cli.project_dir
            .join(&config.database)
            .to_string_lossy()
            .to_string()
    };
    let store = DuckDbStore::open(&db_path)?;

    // D. Run the Pipeline (Application Layer)
    let result = run_pipeline(
        &catalog,
        &config,
        &cli.project_dir,
        &FsDirectoryLister,
        &CsvTableReader,
        &store,
    )
    .await;

    match result {
        Ok(report) => {
            if report.success() {
                println!(
                    "\n✨ SUCCESS! {} sources processed in {:.2?}.",
                    report.outcomes.len(),
                    start.elapsed()
                );
            } else {
                // Completed is Completed: per-source failures live in the
                // report, they do not fail the process.
                eprintln!(
                    "\n⚠️  COMPLETED WITH FAILURES. {} source(s) failed:",
                    report.failed
                );
                for failure in report.failures() {
                    eprintln!(
                        "   ❌ {}: {}",
                        failure.source_name,
                        failure.error_detail.as_deref().unwrap_or("unknown")
                    );
                }
            }
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let args = Cli::parse_from(["regline"]);
        assert_eq!(args.project_dir.to_string_lossy(), ".");
        assert!(!args.verbose);
    }

    #[test]
    fn test_cli_parse_project_dir_and_verbose() {
        let args = Cli::parse_from(["regline", "--project-dir", "/tmp/etl", "-v"]);
        assert_eq!(args.project_dir.to_string_lossy(), "/tmp/etl");
        assert!(args.verbose);
    }
}
