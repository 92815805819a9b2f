//! Identity of the caller, resolved upstream and passed into every call.

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::profile::UserRole;

/// Already-authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail unless the caller is an administrator
    pub fn require_admin(&self) -> DomainResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }

    /// Own resources, or any resource for an administrator
    pub fn require_self_or_admin(&self, owner: Uuid) -> DomainResult<()> {
        if self.user_id == owner || self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}
