//! Docflow CLI
//!
//! Command-line interface for the document approval workflow

use clap::{Parser, Subcommand};
use docflow_core::logging_facility;
use std::path::PathBuf;

mod commands;
mod config;

use commands::Runtime;
use config::DocflowConfig;

#[derive(Debug, Parser)]
#[command(name = "docflow")]
#[command(about = "Docflow - document approval workflow", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./docflow.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overriding configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or migrate the database
    Init(commands::init::InitArgs),
    /// User and role administration
    User(commands::user::UserArgs),
    /// Document operations and workflow transitions
    Doc(commands::doc::DocArgs),
    /// Submitted documents awaiting review
    Queue(commands::queue::QueueArgs),
    /// Audit log listing
    Audit(commands::audit::AuditArgs),
    /// Status counts and recent activity
    Dashboard(commands::dashboard::DashboardArgs),
    /// Evaluate a transition without persisting anything
    Preview(commands::preview::PreviewArgs),
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    DocflowConfig::load_env_file()?;
    let config = DocflowConfig::load(cli.config.as_deref())?;
    logging_facility::init(config.profile()?);

    let mut runtime = Runtime::new(config);
    if let Some(db) = cli.db {
        runtime = runtime.with_db_path(db);
    }

    match cli.command {
        Commands::Init(args) => commands::init::execute(args, &runtime),
        Commands::User(args) => commands::user::execute(args, &runtime),
        Commands::Doc(args) => commands::doc::execute(args, &runtime),
        Commands::Queue(args) => commands::queue::execute(args, &runtime),
        Commands::Audit(args) => commands::audit::execute(args, &runtime),
        Commands::Dashboard(args) => commands::dashboard::execute(args, &runtime),
        Commands::Preview(args) => commands::preview::execute(args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
