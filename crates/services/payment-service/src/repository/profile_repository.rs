//! Profile repository implementation.
//!
//! Profiles are created by the registration flow upstream; this repository
//! only reads them and applies the admin-driven mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::profile::{self, ActiveModel, Entity as ProfileEntity};
use common::{AppError, AppResult};
use domain::{Profile, SubscriptionTier, ROLE_ADMIN};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Profile repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>>;

    /// Find every profile whose ID is in the list; unknown IDs are skipped
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Profile>>;

    /// Write the subscription projection of an approved payment
    async fn apply_subscription(
        &self,
        id: Uuid,
        tier: SubscriptionTier,
        expiry: DateTime<Utc>,
    ) -> AppResult<Profile>;

    /// Inactive non-admin profiles awaiting account approval, oldest first
    async fn list_pending_registrations(&self) -> AppResult<Vec<Profile>>;

    /// Activate or deactivate an account
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Profile>;
}

/// Concrete implementation of ProfileRepository
pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        queries::find_by_id(&self.db, id).await
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        ProfileEntity::find()
            .filter(profile::Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Profile::try_from)
            .collect()
    }

    async fn apply_subscription(
        &self,
        id: Uuid,
        tier: SubscriptionTier,
        expiry: DateTime<Utc>,
    ) -> AppResult<Profile> {
        queries::apply_subscription(&self.db, id, tier, expiry).await
    }

    async fn list_pending_registrations(&self) -> AppResult<Vec<Profile>> {
        ProfileEntity::find()
            .filter(profile::Column::IsActive.eq(false))
            .filter(profile::Column::Role.ne(ROLE_ADMIN))
            .order_by_asc(profile::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Profile::try_from)
            .collect()
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Profile> {
        let model = ProfileEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active_model: ActiveModel = model.into();
        active_model.is_active = Set(active);
        active_model.updated_at = Set(Utc::now());

        let model = active_model.update(&self.db).await?;
        Profile::try_from(model)
    }
}

/// Queries shared by the pooled store and the transaction-scoped repository.
pub(crate) mod queries {
    use super::*;

    pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Profile>> {
        ProfileEntity::find_by_id(id)
            .one(conn)
            .await?
            .map(Profile::try_from)
            .transpose()
    }

    pub(crate) async fn apply_subscription<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        tier: SubscriptionTier,
        expiry: DateTime<Utc>,
    ) -> AppResult<Profile> {
        let model = ProfileEntity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: ActiveModel = model.into();
        active.subscription_tier = Set(tier.as_str().to_string());
        active.subscription_expiry = Set(Some(expiry));
        active.updated_at = Set(Utc::now());

        let model = active.update(conn).await?;
        Profile::try_from(model)
    }
}
