//! Authenticated caller identity.
//!
//! Passed explicitly into every service call that needs authorization,
//! so ownership and role checks live in one place.

use uuid::Uuid;

use super::UserRole;
use crate::errors::{AppError, AppResult};

/// The authenticated user a request acts on behalf of
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    /// Check if actor has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Require admin role, returns Forbidden error if not admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Require the actor to own the resource or be an admin.
    pub fn require_owner_or_admin(&self, owner_id: Uuid) -> AppResult<()> {
        if self.id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_or_admin() {
        let owner = Uuid::new_v4();
        let customer = Actor::new(owner, "a@example.com", UserRole::Customer);
        let stranger = Actor::new(Uuid::new_v4(), "b@example.com", UserRole::Customer);
        let admin = Actor::new(Uuid::new_v4(), "c@example.com", UserRole::Admin);

        assert!(customer.require_owner_or_admin(owner).is_ok());
        assert!(admin.require_owner_or_admin(owner).is_ok());
        assert!(matches!(
            stranger.require_owner_or_admin(owner),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_require_admin() {
        let customer = Actor::new(Uuid::new_v4(), "a@example.com", UserRole::Customer);
        assert!(matches!(customer.require_admin(), Err(AppError::Forbidden)));
    }
}
