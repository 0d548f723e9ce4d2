//! User and role administration
//!
//! Usage:
//!   docflow user add <USERNAME> [--superuser] [--role <ROLE>]...
//!   docflow user grant <USERNAME> <ROLE>
//!   docflow user revoke <USERNAME> <ROLE>
//!   docflow user show <USERNAME>

use super::{print_json, resolve_user, CommandResult, Runtime};
use clap::{Args, Subcommand};
use docflow_core::model::Role;
use docflow_core::roles::RoleDirectory;
use docflow_store::{SqliteRepo, SqliteRoleDirectory};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user
    Add(AddArgs),
    /// Add a role to a user
    Grant(RoleArgs),
    /// Remove a role from a user
    Revoke(RoleArgs),
    /// Print a user's id, roles and superuser flag
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub username: String,

    /// Grant the superuser flag (counts as admin)
    #[arg(long)]
    pub superuser: bool,

    /// Roles to grant: Employee, Manager, Admin
    #[arg(long = "role")]
    pub roles: Vec<Role>,
}

#[derive(Debug, Args)]
pub struct RoleArgs {
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub username: String,
}

pub fn execute(args: UserArgs, runtime: &Runtime) -> CommandResult {
    let conn = runtime.connect_existing()?;

    match args.command {
        UserCommand::Add(add) => {
            if SqliteRepo::find_user_by_username(&conn, &add.username)?.is_some() {
                return Err(format!("user already exists: {}", add.username).into());
            }
            let user_id = SqliteRepo::insert_user(&conn, &add.username, add.superuser)?;
            for role in &add.roles {
                SqliteRepo::assign_role(&conn, user_id, *role)?;
            }
            println!("✓ Created user {} (id {})", add.username, user_id);
        }
        UserCommand::Grant(grant) => {
            let user_id = resolve_user(&conn, &grant.username)?;
            SqliteRepo::assign_role(&conn, user_id, grant.role)?;
            println!("✓ Granted {} to {}", grant.role, grant.username);
        }
        UserCommand::Revoke(revoke) => {
            let user_id = resolve_user(&conn, &revoke.username)?;
            SqliteRepo::revoke_role(&conn, user_id, revoke.role)?;
            println!("✓ Revoked {} from {}", revoke.role, revoke.username);
        }
        UserCommand::Show(show) => {
            let user_id = resolve_user(&conn, &show.username)?;
            let identity = SqliteRoleDirectory::new(&conn).resolve(user_id)?;
            print_json(&identity)?;
        }
    }
    Ok(())
}
