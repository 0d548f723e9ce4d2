//! Identity/role boundary
//!
//! Resolves an actor id to the roles it holds right now. Consulted once per
//! `perform` call; the result is frozen into the execution context.

use crate::errors::WorkflowError;
use crate::model::{ActorIdentity, UserId};
use std::collections::HashMap;

pub trait RoleDirectory {
    fn resolve(&self, actor_id: UserId) -> Result<ActorIdentity, WorkflowError>;
}

/// Fixed in-memory directory
#[derive(Debug, Clone, Default)]
pub struct StaticRoleDirectory {
    identities: HashMap<UserId, ActorIdentity>,
}

impl StaticRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: ActorIdentity) -> Self {
        self.insert(identity);
        self
    }

    pub fn insert(&mut self, identity: ActorIdentity) {
        self.identities.insert(identity.actor_id, identity);
    }
}

impl RoleDirectory for StaticRoleDirectory {
    fn resolve(&self, actor_id: UserId) -> Result<ActorIdentity, WorkflowError> {
        self.identities
            .get(&actor_id)
            .cloned()
            .ok_or(WorkflowError::ActorNotFound { actor_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn test_resolve_known_and_unknown() {
        let directory = StaticRoleDirectory::new()
            .with_identity(ActorIdentity::new(UserId(2)).with_role(Role::Manager));

        let identity = directory.resolve(UserId(2)).unwrap();
        assert!(identity.has_role(Role::Manager));

        assert!(matches!(
            directory.resolve(UserId(99)),
            Err(WorkflowError::ActorNotFound { actor_id: UserId(99) })
        ));
    }

    #[test]
    fn test_insert_replaces_identity() {
        let mut directory = StaticRoleDirectory::new();
        directory.insert(ActorIdentity::new(UserId(4)).with_role(Role::Employee));
        directory.insert(ActorIdentity::new(UserId(4)).with_role(Role::Admin));

        let identity = directory.resolve(UserId(4)).unwrap();
        assert!(identity.has_role(Role::Admin));
        assert!(!identity.has_role(Role::Employee));
    }
}
