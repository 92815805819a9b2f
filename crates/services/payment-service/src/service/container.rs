//! Service Container - Centralized service access.
//!
//! Handlers depend on the `ServiceContainer` trait, never on the concrete
//! services, so the HTTP layer can be tested against mocks.

use std::sync::Arc;

use super::{
    ApprovalQueue, ApprovalQueueService, PaymentManager, PaymentService, ProfileManager,
    ProfileService, SubscriptionActivator, SubscriptionService,
};
use crate::config::PaymentServiceConfig;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get payment record service
    fn payments(&self) -> Arc<dyn PaymentService>;

    /// Get subscription activation service
    fn subscriptions(&self) -> Arc<dyn SubscriptionService>;

    /// Get admin approval queue
    fn queue(&self) -> Arc<dyn ApprovalQueueService>;

    /// Get profile service
    fn profiles(&self) -> Arc<dyn ProfileService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    payment_service: Arc<dyn PaymentService>,
    subscription_service: Arc<dyn SubscriptionService>,
    queue_service: Arc<dyn ApprovalQueueService>,
    profile_service: Arc<dyn ProfileService>,
}

impl Services {
    pub fn new(
        payment_service: Arc<dyn PaymentService>,
        subscription_service: Arc<dyn SubscriptionService>,
        queue_service: Arc<dyn ApprovalQueueService>,
        profile_service: Arc<dyn ProfileService>,
    ) -> Self {
        Self {
            payment_service,
            subscription_service,
            queue_service,
            profile_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &PaymentServiceConfig) -> Self {
        let uow = Arc::new(Persistence::new(db));

        let payment_service: Arc<dyn PaymentService> = Arc::new(PaymentManager::new(uow.clone()));
        let subscription_service =
            Arc::new(SubscriptionActivator::new(uow.clone(), config.approval_mode));
        let queue_service = Arc::new(ApprovalQueue::new(uow.clone(), payment_service.clone()));
        let profile_service = Arc::new(ProfileManager::new(uow));

        tracing::info!(approval_mode = ?config.approval_mode, "payment services initialized");

        Self {
            payment_service,
            subscription_service,
            queue_service,
            profile_service,
        }
    }
}

impl ServiceContainer for Services {
    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }

    fn subscriptions(&self) -> Arc<dyn SubscriptionService> {
        self.subscription_service.clone()
    }

    fn queue(&self) -> Arc<dyn ApprovalQueueService> {
        self.queue_service.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profile_service.clone()
    }
}
