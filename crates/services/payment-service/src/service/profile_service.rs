//! Profile access and account activation.
//!
//! Subscription fields are never written here; they belong to the
//! approval flow in [`super::SubscriptionActivator`].

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, Profile};

use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Profile service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Get a profile (self or admin)
    async fn get_profile(&self, actor: Actor, id: Uuid) -> AppResult<Profile>;

    /// Accounts waiting for activation, oldest first (admin only)
    async fn list_pending_registrations(&self, actor: Actor) -> AppResult<Vec<Profile>>;

    /// Activate a registration (admin only)
    async fn activate(&self, actor: Actor, id: Uuid) -> AppResult<Profile>;

    /// Deactivate an account (admin only)
    async fn deactivate(&self, actor: Actor, id: Uuid) -> AppResult<Profile>;
}

pub struct ProfileManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProfileManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn set_active(&self, actor: Actor, id: Uuid, active: bool) -> AppResult<Profile> {
        actor.require_admin()?;

        let target = self
            .uow
            .profiles()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")?;
        if target.is_admin() {
            return Err(AppError::validation(
                "Administrator accounts cannot be activated or deactivated here",
            ));
        }

        let profile = self.uow.profiles().set_active(id, active).await?;
        tracing::info!(
            user_id = %id,
            admin_id = %actor.user_id,
            is_active = active,
            "account activation changed"
        );
        Ok(profile)
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfileService for ProfileManager<U> {
    async fn get_profile(&self, actor: Actor, id: Uuid) -> AppResult<Profile> {
        actor.require_self_or_admin(id)?;
        self.uow
            .profiles()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn list_pending_registrations(&self, actor: Actor) -> AppResult<Vec<Profile>> {
        actor.require_admin()?;
        self.uow.profiles().list_pending_registrations().await
    }

    async fn activate(&self, actor: Actor, id: Uuid) -> AppResult<Profile> {
        self.set_active(actor, id, true).await
    }

    async fn deactivate(&self, actor: Actor, id: Uuid) -> AppResult<Profile> {
        self.set_active(actor, id, false).await
    }
}
