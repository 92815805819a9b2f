//! Admin approval queue - pending payments, pending registrations, counts.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::try_join;

use common::AppResult;
use domain::{Actor, QueueOverview};

use super::PaymentService;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Approval queue trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ApprovalQueueService: Send + Sync {
    /// Everything awaiting an admin decision, plus payment counts
    async fn overview(&self, actor: Actor) -> AppResult<QueueOverview>;
}

pub struct ApprovalQueue<U: UnitOfWork> {
    uow: Arc<U>,
    payments: Arc<dyn PaymentService>,
}

impl<U: UnitOfWork> ApprovalQueue<U> {
    pub fn new(uow: Arc<U>, payments: Arc<dyn PaymentService>) -> Self {
        Self { uow, payments }
    }
}

#[async_trait]
impl<U: UnitOfWork> ApprovalQueueService for ApprovalQueue<U> {
    async fn overview(&self, actor: Actor) -> AppResult<QueueOverview> {
        actor.require_admin()?;

        let profiles = self.uow.profiles();
        let payments = self.uow.payments();

        // Three independent reads
        let (pending_payments, pending_registrations, stats) = try_join!(
            self.payments.list_pending(actor),
            profiles.list_pending_registrations(),
            payments.count_by_status(),
        )?;

        Ok(QueueOverview {
            pending_payments,
            pending_registrations,
            stats,
        })
    }
}
