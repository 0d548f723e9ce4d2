//! Dry-run a transition decision without touching the database
//!
//! Usage: docflow preview --status <STATUS> --action <NAME> [--owner] [--manager] [--admin]

use super::{print_json, CommandResult};
use clap::Args;
use docflow_core::model::DocumentStatus;
use docflow_core::state_machine::ActorContext;
use docflow_core::WorkflowEngine;
use serde_json::json;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// DRAFT, SUBMITTED, APPROVED or REJECTED
    #[arg(long)]
    pub status: DocumentStatus,

    /// Action name; unknown names are reported, not rejected
    #[arg(long)]
    pub action: String,

    #[arg(long)]
    pub owner: bool,

    #[arg(long)]
    pub manager: bool,

    #[arg(long)]
    pub admin: bool,
}

pub fn execute(args: PreviewArgs) -> CommandResult {
    let actor = ActorContext {
        is_owner: args.owner,
        is_manager: args.manager,
        is_admin: args.admin,
    };
    let decision = WorkflowEngine::decide_named(args.status, &args.action, actor);

    print_json(&json!({
        "allowed": decision.is_allowed(),
        "next_status": decision.next_status(),
        "failure": decision.failure().map(|f| f.as_str()),
        "reason": decision.reason(),
        "effects": decision.effects(),
    }))
}
