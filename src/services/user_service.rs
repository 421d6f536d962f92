//! User administration and profile lookup.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Actor, NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Admin-side account creation
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    /// Omitted for accounts that will only sign in through the identity provider
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: UserRole,
}

#[async_trait]
pub trait UserService: Send + Sync {
    /// Profile of the caller
    async fn current_user(&self, actor: &Actor) -> AppResult<User>;

    async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>>;

    async fn create_user(&self, actor: &Actor, input: CreateUserInput) -> AppResult<User>;

    async fn change_role(&self, actor: &Actor, id: Uuid, role: UserRole) -> AppResult<User>;

    /// Make an existing account an administrator (operator CLI, no caller identity).
    ///
    /// Returns the user and whether anything changed.
    async fn promote(&self, email: &str) -> AppResult<(User, bool)>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn current_user(&self, actor: &Actor) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>> {
        actor.require_admin()?;
        self.uow.users().list().await
    }

    async fn create_user(&self, actor: &Actor, input: CreateUserInput) -> AppResult<User> {
        actor.require_admin()?;

        if self.uow.users().find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = match input.password.as_deref() {
            Some(plain) => Some(Password::new(plain)?.into_string()),
            None => None,
        };

        let user = self
            .uow
            .users()
            .create(NewUser {
                email: input.email,
                password_hash,
                name: input.name,
                role: input.role,
            })
            .await?;

        tracing::info!(admin_id = %actor.id, user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    async fn change_role(&self, actor: &Actor, id: Uuid, role: UserRole) -> AppResult<User> {
        actor.require_admin()?;
        let user = self.uow.users().update_role(id, role).await?;
        tracing::info!(admin_id = %actor.id, user_id = %id, role = %role, "User role changed");
        Ok(user)
    }

    async fn promote(&self, email: &str) -> AppResult<(User, bool)> {
        let user = self
            .uow
            .users()
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound)?;

        if user.is_admin() {
            return Ok((user, false));
        }

        let user = self.uow.users().update_role(user.id, UserRole::Admin).await?;
        Ok((user, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockUserRepository, RepositorySet};

    fn manager(users: MockUserRepository) -> UserManager<RepositorySet> {
        UserManager::new(Arc::new(RepositorySet {
            users: Arc::new(users),
            ..Default::default()
        }))
    }

    fn customer() -> Actor {
        Actor::new(Uuid::new_v4(), "c@example.com", UserRole::Customer)
    }

    fn admin() -> Actor {
        Actor::new(Uuid::new_v4(), "a@example.com", UserRole::Admin)
    }

    #[tokio::test]
    async fn test_customers_cannot_administer_users() {
        let mut users = MockUserRepository::new();
        users.expect_list().never();
        users.expect_update_role().never();
        let service = manager(users);

        assert!(matches!(
            service.list_users(&customer()).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            service
                .change_role(&customer(), Uuid::new_v4(), UserRole::Admin)
                .await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_admin_creates_passwordless_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|u| u.password_hash.is_none() && u.role == UserRole::Admin)
            .returning(|u| {
                let mut user = User::new(Uuid::new_v4(), u.email, None, u.name);
                user.role = u.role;
                Ok(user)
            });

        let user = manager(users)
            .create_user(
                &admin(),
                CreateUserInput {
                    email: "ops@example.com".into(),
                    password: None,
                    name: None,
                    role: UserRole::Admin,
                },
            )
            .await
            .unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_promote_is_noop_for_admins() {
        let mut existing = User::new(Uuid::new_v4(), "a@example.com".into(), None, None);
        existing.role = UserRole::Admin;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_update_role().never();

        let (user, changed) = manager(users).promote("a@example.com").await.unwrap();
        assert!(user.is_admin());
        assert!(!changed);
    }

    #[tokio::test]
    async fn test_promote_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let result = manager(users).promote("ghost@example.com").await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
