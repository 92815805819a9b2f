//! Payment record store - submission and read access to payments.
//!
//! Submissions are validated by the domain before any I/O, so refused input
//! (card payments, missing receipts) never reaches the database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, Payment, PaymentStatus, PendingPayment, Profile, SubmitPayment};

use crate::infra::UnitOfWork;
use crate::repository::PaymentFilter;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Payment service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Submit a payment on behalf of the calling user
    async fn submit_payment(&self, actor: Actor, input: SubmitPayment) -> AppResult<Payment>;

    /// Get one payment (owner or admin)
    async fn get_payment(&self, actor: Actor, id: Uuid) -> AppResult<Payment>;

    /// Pending payments with owner details, oldest first (admin only)
    async fn list_pending(&self, actor: Actor) -> AppResult<Vec<PendingPayment>>;

    /// Payment history of a user, newest first (self or admin)
    async fn list_by_user(&self, actor: Actor, user_id: Uuid) -> AppResult<Vec<Payment>>;

    /// All payments, optionally of one status (admin only)
    async fn list_all(&self, actor: Actor, status: Option<PaymentStatus>) -> AppResult<Vec<Payment>>;

    /// Replace admin notes on any payment (admin only)
    async fn update_notes(&self, actor: Actor, id: Uuid, notes: Option<String>) -> AppResult<Payment>;
}

/// Concrete implementation of PaymentService using Unit of Work.
pub struct PaymentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PaymentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentManager<U> {
    async fn submit_payment(&self, actor: Actor, input: SubmitPayment) -> AppResult<Payment> {
        let payment = Payment::submit(actor.user_id, input, Utc::now())?;

        // Administrators never hold subscriptions
        if actor.is_admin() {
            return Err(AppError::Forbidden);
        }
        let owner = self
            .uow
            .profiles()
            .find_by_id(actor.user_id)
            .await?
            .ok_or_not_found("User")?;
        if owner.is_admin() {
            return Err(AppError::Forbidden);
        }

        let payment = self.uow.payments().insert(payment).await?;
        tracing::info!(
            payment_id = %payment.id,
            user_id = %payment.user_id,
            plan = %payment.plan_type,
            amount = payment.amount,
            "payment submitted for review"
        );

        Ok(payment)
    }

    async fn get_payment(&self, actor: Actor, id: Uuid) -> AppResult<Payment> {
        let payment = self
            .uow
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Payment")?;

        actor.require_self_or_admin(payment.user_id)?;
        Ok(payment)
    }

    async fn list_pending(&self, actor: Actor) -> AppResult<Vec<PendingPayment>> {
        actor.require_admin()?;

        let payments = self.uow.payments().list(PaymentFilter::pending_queue()).await?;

        let mut owner_ids: Vec<Uuid> = payments.iter().map(|p| p.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<Uuid, Profile> = self
            .uow
            .profiles()
            .find_by_ids(owner_ids)
            .await?
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect();

        Ok(payments
            .into_iter()
            .map(|payment| {
                let owner = owners.get(&payment.user_id);
                PendingPayment::new(payment, owner)
            })
            .collect())
    }

    async fn list_by_user(&self, actor: Actor, user_id: Uuid) -> AppResult<Vec<Payment>> {
        actor.require_self_or_admin(user_id)?;
        self.uow.payments().list(PaymentFilter::for_user(user_id)).await
    }

    async fn list_all(&self, actor: Actor, status: Option<PaymentStatus>) -> AppResult<Vec<Payment>> {
        actor.require_admin()?;
        self.uow.payments().list(PaymentFilter::with_status(status)).await
    }

    async fn update_notes(&self, actor: Actor, id: Uuid, notes: Option<String>) -> AppResult<Payment> {
        actor.require_admin()?;

        let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let payment = self.uow.payments().update_notes(id, notes).await?;
        tracing::info!(payment_id = %id, admin_id = %actor.user_id, "admin notes updated");

        Ok(payment)
    }
}
