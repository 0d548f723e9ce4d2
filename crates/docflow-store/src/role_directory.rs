//! Role directory backed by the `users` and `user_roles` tables

use crate::repo::SqliteRepo;
use docflow_core::errors::WorkflowError;
use docflow_core::model::{ActorIdentity, UserId};
use docflow_core::roles::RoleDirectory;
use rusqlite::Connection;

/// Reads an actor's roles fresh on every `resolve`
pub struct SqliteRoleDirectory<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteRoleDirectory<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl RoleDirectory for SqliteRoleDirectory<'_> {
    fn resolve(&self, actor_id: UserId) -> Result<ActorIdentity, WorkflowError> {
        SqliteRepo::load_identity(self.conn, actor_id)?
            .ok_or(WorkflowError::ActorNotFound { actor_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use docflow_core::model::Role;

    #[test]
    fn test_resolve_reads_current_roles() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let admin = SqliteRepo::insert_user(&conn, "root", true).unwrap();
        SqliteRepo::assign_role(&conn, admin, Role::Admin).unwrap();

        let directory = SqliteRoleDirectory::new(&conn);
        let identity = directory.resolve(admin).unwrap();
        assert!(identity.is_superuser);
        assert!(identity.has_role(Role::Admin));

        assert!(matches!(
            directory.resolve(UserId(404)),
            Err(WorkflowError::ActorNotFound { .. })
        ));
    }
}
