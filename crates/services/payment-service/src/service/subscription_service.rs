//! Subscription activation - applies admin decisions to pending payments.
//!
//! Approval writes two rows: the payment stamp and the owner's subscription
//! projection. In `Transactional` mode both share one database transaction.
//! In `TwoPhase` mode they are independent, and a failed profile write after
//! a successful stamp is reported as `AppError::PartialApply` so the caller
//! can run `resync_subscription` instead of re-approving.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, Approval, Decision, Payment, PaymentDecision, PaymentStatus, Profile};

use crate::config::ApprovalMode;
use crate::infra::UnitOfWork;
use crate::repository::PaymentFilter;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Log target for subscription projections that diverged from payments.
pub const DRIFT_LOG_TARGET: &str = "subscription_drift";

/// Subscription service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Approve a pending payment and activate the owner's subscription
    async fn approve(&self, actor: Actor, payment_id: Uuid, notes: Option<String>) -> AppResult<Approval>;

    /// Reject a pending payment; the owner's profile is left untouched
    async fn reject(&self, actor: Actor, payment_id: Uuid, notes: Option<String>) -> AppResult<Payment>;

    /// Re-write the subscription granted by an already approved payment.
    ///
    /// Recovery path after `PartialApply`; never re-stamps the payment.
    async fn resync_subscription(&self, actor: Actor, payment_id: Uuid) -> AppResult<Approval>;
}

/// Concrete implementation of SubscriptionService using Unit of Work.
pub struct SubscriptionActivator<U: UnitOfWork> {
    uow: Arc<U>,
    mode: ApprovalMode,
}

impl<U: UnitOfWork> SubscriptionActivator<U> {
    pub fn new(uow: Arc<U>, mode: ApprovalMode) -> Self {
        Self { uow, mode }
    }

    async fn load_payment(&self, id: Uuid) -> AppResult<Payment> {
        self.uow
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Payment")
    }

    /// Owner must exist and must not be an administrator.
    async fn load_subscriber(&self, payment: &Payment) -> AppResult<Profile> {
        let owner = self
            .uow
            .profiles()
            .find_by_id(payment.user_id)
            .await?
            .ok_or_not_found("User")?;

        if owner.is_admin() {
            return Err(AppError::validation(
                "Administrator accounts cannot hold a subscription",
            ));
        }
        Ok(owner)
    }

    async fn approve_transactional(&self, id: Uuid, decision: PaymentDecision) -> AppResult<Approval> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let payment = ctx
                        .payments()
                        .mark_decided(id, &decision)
                        .await?
                        .ok_or_else(|| already_decided(id))?;

                    let profile = ctx
                        .profiles()
                        .apply_subscription(payment.user_id, payment.plan_type.into(), payment.expires_at)
                        .await?;

                    Ok(Approval { payment, profile })
                })
            })
            .await
    }

    async fn approve_two_phase(&self, id: Uuid, decision: PaymentDecision) -> AppResult<Approval> {
        let processed_at = decision.processed_at;
        let admin_id = decision.processed_by;

        let payment = self
            .uow
            .payments()
            .mark_decided(id, decision)
            .await?
            .ok_or_else(|| already_decided(id))?;

        match self
            .uow
            .profiles()
            .apply_subscription(payment.user_id, payment.plan_type.into(), payment.expires_at)
            .await
        {
            Ok(profile) => Ok(Approval { payment, profile }),
            Err(source) => {
                tracing::error!(
                    target: DRIFT_LOG_TARGET,
                    payment_id = %payment.id,
                    user_id = %payment.user_id,
                    admin_id = %admin_id,
                    processed_at = %processed_at,
                    plan = %payment.plan_type,
                    error = %source,
                    "payment approved but subscription write failed; resync required"
                );
                Err(AppError::PartialApply {
                    payment_id: payment.id,
                    user_id: payment.user_id,
                    source: Box::new(source),
                })
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> SubscriptionService for SubscriptionActivator<U> {
    async fn approve(&self, actor: Actor, payment_id: Uuid, notes: Option<String>) -> AppResult<Approval> {
        actor.require_admin()?;

        let payment = self.load_payment(payment_id).await?;
        let decision = payment.decide(Decision::Approve, actor.user_id, notes, Utc::now())?;
        self.load_subscriber(&payment).await?;

        let processed_at = decision.processed_at;
        let result = match self.mode {
            ApprovalMode::Transactional => self.approve_transactional(payment_id, decision).await,
            ApprovalMode::TwoPhase => self.approve_two_phase(payment_id, decision).await,
        };

        match &result {
            Ok(approval) => tracing::info!(
                payment_id = %payment_id,
                user_id = %approval.profile.id,
                admin_id = %actor.user_id,
                tier = %approval.profile.subscription_tier,
                expires_at = %approval.payment.expires_at,
                "payment approved and subscription activated"
            ),
            // PartialApply was already logged under the drift target
            Err(e) if e.is_fault() && !matches!(e, AppError::PartialApply { .. }) => tracing::error!(
                payment_id = %payment_id,
                user_id = %payment.user_id,
                admin_id = %actor.user_id,
                processed_at = %processed_at,
                error = %e,
                "payment approval failed"
            ),
            Err(_) => {}
        }

        result
    }

    async fn reject(&self, actor: Actor, payment_id: Uuid, notes: Option<String>) -> AppResult<Payment> {
        actor.require_admin()?;

        let payment = self.load_payment(payment_id).await?;
        let decision = payment.decide(Decision::Reject, actor.user_id, notes, Utc::now())?;
        let processed_at = decision.processed_at;

        let result = self.uow.payments().mark_decided(payment_id, decision).await;
        match result {
            Ok(Some(payment)) => {
                tracing::info!(
                    payment_id = %payment_id,
                    user_id = %payment.user_id,
                    admin_id = %actor.user_id,
                    "payment rejected"
                );
                Ok(payment)
            }
            Ok(None) => Err(already_decided(payment_id)),
            Err(e) => {
                tracing::error!(
                    payment_id = %payment_id,
                    user_id = %payment.user_id,
                    admin_id = %actor.user_id,
                    processed_at = %processed_at,
                    error = %e,
                    "payment rejection failed"
                );
                Err(e)
            }
        }
    }

    async fn resync_subscription(&self, actor: Actor, payment_id: Uuid) -> AppResult<Approval> {
        actor.require_admin()?;

        let payment = self.load_payment(payment_id).await?;
        if payment.status != PaymentStatus::Approved {
            return Err(AppError::invalid_state(format!(
                "Only approved payments can be synced; payment {} is {}",
                payment.id, payment.status
            )));
        }

        // Never roll a user back to an older approval
        let latest_approved = self
            .uow
            .payments()
            .list(PaymentFilter {
                status: Some(PaymentStatus::Approved),
                ..PaymentFilter::for_user(payment.user_id)
            })
            .await?
            .into_iter()
            .max_by_key(|p| p.processed_at);
        if let Some(latest) = latest_approved.filter(|latest| latest.id != payment.id) {
            if latest.processed_at > payment.processed_at {
                return Err(AppError::invalid_state(format!(
                    "Payment {} was superseded by the later approval {}",
                    payment.id, latest.id
                )));
            }
        }

        self.load_subscriber(&payment).await?;
        let profile = self
            .uow
            .profiles()
            .apply_subscription(payment.user_id, payment.plan_type.into(), payment.expires_at)
            .await?;

        tracing::info!(
            target: DRIFT_LOG_TARGET,
            payment_id = %payment.id,
            user_id = %profile.id,
            admin_id = %actor.user_id,
            tier = %profile.subscription_tier,
            "subscription re-synced from approved payment"
        );

        Ok(Approval { payment, profile })
    }
}

fn already_decided(id: Uuid) -> AppError {
    AppError::invalid_state(format!("Payment {} has already been decided", id))
}
