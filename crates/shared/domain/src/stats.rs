//! Derived figures shown on the admin approval queue.

use serde::Serialize;

use crate::payment::{Payment, PaymentStatus};

/// Payment counts by status with the derived approval rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentStats {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub total: u64,
    /// Percentage of decided payments that were approved
    pub approval_rate: f64,
}

impl PaymentStats {
    pub fn from_counts(pending: u64, approved: u64, rejected: u64) -> Self {
        Self {
            pending,
            approved,
            rejected,
            total: pending + approved + rejected,
            approval_rate: approval_rate(approved, rejected),
        }
    }

    pub fn from_payments<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> Self {
        let (mut pending, mut approved, mut rejected) = (0, 0, 0);
        for payment in payments {
            match payment.status {
                PaymentStatus::Pending => pending += 1,
                PaymentStatus::Approved => approved += 1,
                PaymentStatus::Rejected => rejected += 1,
            }
        }
        Self::from_counts(pending, approved, rejected)
    }
}

/// `approved / (approved + rejected)` as a percentage; 0 when nothing is decided.
pub fn approval_rate(approved: u64, rejected: u64) -> f64 {
    let decided = approved + rejected;
    if decided == 0 {
        return 0.0;
    }
    approved as f64 * 100.0 / decided as f64
}
