//! Application services - payment intake, approval, queue and profiles.
//!
//! All services use the Unit of Work for repository access and
//! transaction management.

mod approval_queue;
pub mod container;
mod payment_service;
mod profile_service;
mod subscription_service;

pub use approval_queue::{ApprovalQueue, ApprovalQueueService};
pub use container::{ServiceContainer, Services};
pub use payment_service::{PaymentManager, PaymentService};
pub use profile_service::{ProfileManager, ProfileService};
pub use subscription_service::{SubscriptionActivator, SubscriptionService, DRIFT_LOG_TARGET};

#[cfg(any(test, feature = "test-utils"))]
pub use approval_queue::MockApprovalQueueService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_service::MockPaymentService;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_service::MockProfileService;
#[cfg(any(test, feature = "test-utils"))]
pub use subscription_service::MockSubscriptionService;
