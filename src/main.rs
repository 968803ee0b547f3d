use anyhow::Result;
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mdqp::config::{ReleaseSettings, SyncSettings};
use mdqp::git::Git2Repository;
use mdqp::mdq::MdqClient;
use mdqp::release::{self, SystemRunner};
use mdqp::sync::SyncPipeline;
use mdqp::ui;
use mdqp::workdir::Workdir;

#[derive(Parser)]
#[command(
    name = "mdqp",
    version,
    about = "Keep an MDQ publishing directory in sync and release its container image"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan incoming metadata and fetch signed documents from the MDQ service
    Sync,
    /// Build the container image, tag it from git state and push both tags
    Release,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Sync => cmd_sync(),
        Commands::Release => cmd_release(),
    };

    if let Err(e) = result {
        ui::display_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn cmd_sync() -> Result<()> {
    let settings = SyncSettings::from_env()?;
    let client = MdqClient::new(&settings.mdq_service);
    let workdir = Workdir::new(&settings.base_dir);

    let pipeline = SyncPipeline::new(workdir, &client, &settings, Local::now().hour());
    let outcome = pipeline.run()?;

    tracing::info!(
        "run complete: {} fetched, {} skipped, {} still queued",
        outcome.fetched,
        outcome.vanished,
        outcome.remaining
    );
    Ok(())
}

fn cmd_release() -> Result<()> {
    // Fail on a missing commit before touching git or docker.
    let settings = ReleaseSettings::from_env()?;
    let project_dir = std::env::current_dir()?;
    let repo = Git2Repository::open(&project_dir)?;

    ui::display_status(&format!("Releasing commit {}", settings.commit));
    let outcome = release::run(&repo, &SystemRunner, &project_dir, &settings.commit)?;

    ui::display_success(&format!("Pushed {}", outcome.tags.versioned));
    ui::display_success(&format!("Pushed {}", outcome.tags.latest));
    Ok(())
}
