//! Read models for the admin approval screens.

use serde::Serialize;

use crate::payment::Payment;
use crate::profile::{Profile, UserRole};
use crate::stats::PaymentStats;

/// Pending payment joined with the fields of its owner the admin needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PendingPayment {
    #[serde(flatten)]
    pub payment: Payment,
    /// `None` when the owning profile no longer exists
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub owner_role: Option<UserRole>,
}

impl PendingPayment {
    pub fn new(payment: Payment, owner: Option<&Profile>) -> Self {
        Self {
            payment,
            owner_name: owner.map(|p| p.display_name().to_string()),
            owner_email: owner.map(|p| p.email.clone()),
            owner_role: owner.map(|p| p.role),
        }
    }
}

/// Everything the admin dashboard shows on its approval tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct QueueOverview {
    pub pending_payments: Vec<PendingPayment>,
    pub pending_registrations: Vec<Profile>,
    pub stats: PaymentStats,
}
