//! Review queue
//!
//! Usage: docflow queue --as <USER> [--json]

use super::doc::print_document;
use super::{print_json, require, resolve_identity, CommandResult, Runtime};
use clap::Args;
use docflow_store::queries;

#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Reviewer username (Manager or Admin); their own documents are excluded
    #[arg(long = "as")]
    pub actor: String,

    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: QueueArgs, runtime: &Runtime) -> CommandResult {
    let conn = runtime.connect_existing()?;
    let reviewer = resolve_identity(&conn, &args.actor)?;
    require(reviewer.can_review(), &args.actor, "read the review queue")?;
    let pending = queries::review_queue(&conn, reviewer.actor_id)?;

    if args.json {
        return print_json(&pending);
    }
    if pending.is_empty() {
        println!("Review queue is empty.");
    }
    for document in &pending {
        print_document(document);
    }
    Ok(())
}
