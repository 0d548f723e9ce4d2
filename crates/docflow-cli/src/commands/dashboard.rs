//! Status counts, pending reviews and recent activity
//!
//! Usage: docflow dashboard --as <USER> [--json]

use super::{print_json, require, resolve_identity, CommandResult, Runtime};
use clap::Args;
use docflow_store::queries;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Manager or Admin username
    #[arg(long = "as")]
    pub actor: String,

    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: DashboardArgs, runtime: &Runtime) -> CommandResult {
    let conn = runtime.connect_existing()?;
    let viewer = resolve_identity(&conn, &args.actor)?;
    require(viewer.can_view_dashboard(), &args.actor, "view the dashboard")?;
    let summary = queries::dashboard_summary(&conn, viewer.actor_id)?;

    if args.json {
        return print_json(&summary);
    }

    let counts = &summary.counts;
    println!("Documents: {}", counts.total());
    println!("  DRAFT:     {}", counts.draft);
    println!("  SUBMITTED: {}", counts.submitted);
    println!("  APPROVED:  {}", counts.approved);
    println!("  REJECTED:  {}", counts.rejected);
    println!("Pending review for {}: {}", args.actor, summary.pending_for_viewer);
    println!("Recent activity:");
    for log in &summary.recent_activity {
        println!("  {} {}", log.created_at.to_rfc3339(), log.action);
    }
    Ok(())
}
