//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! profiles, subscription payments and the rules that move a payment from
//! `pending` to a final decision.

pub mod actor;
pub mod constants;
pub mod error;
pub mod payment;
pub mod profile;
pub mod queue;
pub mod stats;

pub use actor::Actor;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use payment::{
    is_method_available, subscription_expiry_from, Approval, Decision, Payment, PaymentDecision,
    PaymentMethod, PaymentStatus, PlanType, SubmitPayment,
};
pub use profile::{Profile, SubscriptionTier, UserRole};
pub use queue::{PendingPayment, QueueOverview};
pub use stats::{approval_rate, PaymentStats};
