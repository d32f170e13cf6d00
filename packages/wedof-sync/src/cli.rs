//! Command-line interface for the sync.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{SyncConfig, SyncOverrides};
use crate::error::Result;
use crate::sync::{SyncReport, SyncService};

/// Wedof sync - Mirror Wedof API collections into one sheet per record type.
#[derive(Parser)]
#[command(name = "wedof-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one synchronization and exit.
    Sync {
        /// Directory receiving the sheets (default: $WEDOF_OUTPUT_DIR or wedof-export/)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Synchronize now, then every day at a fixed time.
    Schedule {
        /// Daily sync time in HH:MM format (default: $SYNC_TIME or 09:00)
        #[arg(long)]
        at: Option<String>,
    },

    /// Check that the Wedof API answers and the sheet destination is usable.
    TestConnection,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync { output } => {
            let config = SyncConfig::from_env_with(&SyncOverrides {
                output_dir: output,
                ..Default::default()
            })?;
            sync_command(&config)
        }
        Commands::Schedule { at } => {
            let config = SyncConfig::from_env_with(&SyncOverrides {
                sync_time: at,
                ..Default::default()
            })?;
            let service = SyncService::from_config(&config)?;
            println!(
                "{} daily at {}",
                style("Scheduling sync").bold(),
                style(config.sync_time.format("%H:%M")).green()
            );
            service.run_scheduler()
        }
        Commands::TestConnection => test_connection_command(&SyncConfig::from_env()?),
    }
}

/// Execute the one-shot sync command.
fn sync_command(config: &SyncConfig) -> Result<()> {
    let service = SyncService::from_config(config)?;

    println!(
        "{} {} into {}",
        style("Syncing").bold(),
        style(&config.client.base_url).cyan(),
        style(config.output_dir.display()).green()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Fetching Wedof collections...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = service.run_once();

    pb.finish_and_clear();
    print_report(&report);

    Ok(())
}

fn print_report(report: &SyncReport) {
    for (name, count) in &report.counts {
        let failure = report
            .fetch_failures
            .iter()
            .find(|(failed, _)| failed == name)
            .map(|(_, error)| error);
        match failure {
            Some(error) => println!("  {} {name}: {}", style("✗").red(), style(error).red()),
            None => println!("  {} {name}: {count}", style("✓").green()),
        }
    }

    println!();
    println!("  Records: {}", report.total_records());
    println!("  Sheets written: {}", report.mirror.written.len());
    if !report.mirror.skipped.is_empty() {
        println!(
            "  Empty sheets skipped: {}",
            style(report.mirror.skipped.len()).yellow()
        );
    }
    for (title, error) in &report.mirror.failed {
        println!("  {} sheet {title}: {}", style("✗").red(), style(error).red());
    }

    println!();
    println!(
        "{} {}",
        style("Sheets available in:").green().bold(),
        report.location
    );
}

/// Execute the connection check against both the API and the sheet destination.
fn test_connection_command(config: &SyncConfig) -> Result<()> {
    let service = SyncService::from_config(config)?;
    let users = service.test_connection()?;

    println!(
        "{} Wedof connection OK - {} users found",
        style("✓").green(),
        users
    );
    println!(
        "{} Sheet destination OK - {}",
        style("✓").green(),
        config.output_dir.display()
    );
    Ok(())
}
