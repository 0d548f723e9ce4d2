//! Database initialization
//!
//! Usage: docflow init [--print-config]

use super::{CommandResult, Runtime};
use clap::Args;
use docflow_store::migrations::applied_migrations;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub print_config: bool,
}

pub fn execute(args: InitArgs, runtime: &Runtime) -> CommandResult {
    let conn = runtime.connect()?;
    let applied = applied_migrations(&conn)?;

    println!("✓ Database ready at {}", runtime.db_path().display());
    println!("  Migrations applied: {}", applied.len());

    if args.print_config {
        print!("{}", runtime.config.to_toml()?);
    }
    Ok(())
}
