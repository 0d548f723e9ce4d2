//! Caller identity as resolved by the role directory

use crate::errors::{ExError, ExErrorKind};
use crate::model::ids::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Group membership relevant to the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Employee" => Ok(Role::Employee),
            "Manager" => Ok(Role::Manager),
            "Admin" => Ok(Role::Admin),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_role")
                .with_message(format!("Unknown role: {}", other))),
        }
    }
}

/// Who is calling, independent of any particular document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    pub actor_id: UserId,
    pub roles: BTreeSet<Role>,
    pub is_superuser: bool,
}

impl ActorIdentity {
    pub fn new(actor_id: UserId) -> Self {
        Self {
            actor_id,
            roles: BTreeSet::new(),
            is_superuser: false,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Admin role or superuser
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.has_role(Role::Admin)
    }

    /// May read the review queue (approvers: Manager or Admin)
    pub fn can_review(&self) -> bool {
        self.has_role(Role::Manager) || self.is_admin()
    }

    /// May read the dashboard (Manager or Admin)
    pub fn can_view_dashboard(&self) -> bool {
        self.can_review()
    }

    /// May read the system-wide audit log
    pub fn can_audit(&self) -> bool {
        self.is_admin()
    }

    /// May read one document together with its decision and audit trail
    pub fn can_view_document(&self, owner_id: UserId) -> bool {
        self.actor_id == owner_id || self.can_review()
    }
}
