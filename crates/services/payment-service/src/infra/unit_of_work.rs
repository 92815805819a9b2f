//! Unit of Work pattern implementation.
//!
//! Centralizes access to the payment and profile repositories and owns the
//! database transaction lifecycle. Approving a payment touches both tables,
//! which is the one multi-row write in the service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

use crate::repository::{
    payment_queries, profile_queries, PaymentRepository, PaymentStore, ProfileRepository,
    ProfileStore,
};
use common::{AppError, AppResult};
use domain::{Payment, PaymentDecision, Profile, SubscriptionTier};

/// Boxed future returned by transactional closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, implement it over mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get payment repository
    fn payments(&self) -> Arc<dyn PaymentRepository>;

    /// Get profile repository
    fn profiles(&self) -> Arc<dyn ProfileRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get payment repository for this transaction
    pub fn payments(&self) -> TxPaymentRepository<'_> {
        TxPaymentRepository { txn: self.txn }
    }

    /// Get profile repository for this transaction
    pub fn profiles(&self) -> TxProfileRepository<'_> {
        TxProfileRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    payment_repo: Arc<PaymentStore>,
    profile_repo: Arc<ProfileStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let payment_repo = Arc::new(PaymentStore::new(db.clone()));
        let profile_repo = Arc::new(ProfileStore::new(db.clone()));
        Self {
            db,
            payment_repo,
            profile_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payment_repo.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profile_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // ReadCommitted is enough: the payment stamp is itself conditional
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware payment repository.
pub struct TxPaymentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxPaymentRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        payment_queries::find_by_id(self.txn, id).await
    }

    /// Conditional decision stamp, see [`PaymentRepository::mark_decided`]
    pub async fn mark_decided(
        &self,
        id: Uuid,
        decision: &PaymentDecision,
    ) -> AppResult<Option<Payment>> {
        payment_queries::mark_decided(self.txn, id, decision).await
    }
}

/// Transaction-aware profile repository.
pub struct TxProfileRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProfileRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        profile_queries::find_by_id(self.txn, id).await
    }

    pub async fn apply_subscription(
        &self,
        id: Uuid,
        tier: SubscriptionTier,
        expiry: DateTime<Utc>,
    ) -> AppResult<Profile> {
        profile_queries::apply_subscription(self.txn, id, tier, expiry).await
    }
}
