//! Payment domain entity, its status machine and the card-payment gate.

use std::str::FromStr;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    CARD_UNAVAILABLE_MESSAGE, METHOD_BANK_TRANSFER, METHOD_CARD, STATUS_APPROVED, STATUS_PENDING,
    STATUS_REJECTED, SUBSCRIPTION_TERM_MONTHS, TIER_ARGENT, TIER_BRONZE, TIER_OR,
};
use crate::error::{DomainError, DomainResult};

/// Paid subscription plan a payment buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Bronze,
    Argent,
    Or,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Bronze => TIER_BRONZE,
            PlanType::Argent => TIER_ARGENT,
            PlanType::Or => TIER_OR,
        }
    }
}

impl FromStr for PlanType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TIER_BRONZE => Ok(PlanType::Bronze),
            TIER_ARGENT => Ok(PlanType::Argent),
            TIER_OR => Ok(PlanType::Or),
            other => Err(DomainError::validation(format!("Unknown plan type '{}'", other))),
        }
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => METHOD_BANK_TRANSFER,
            PaymentMethod::Card => METHOD_CARD,
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            METHOD_BANK_TRANSFER => Ok(PaymentMethod::BankTransfer),
            METHOD_CARD => Ok(PaymentMethod::Card),
            other => Err(DomainError::validation(format!(
                "Unknown payment method '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card processing is switched off for the whole marketplace.
pub fn is_method_available(method: PaymentMethod) -> bool {
    match method {
        PaymentMethod::BankTransfer => true,
        PaymentMethod::Card => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => STATUS_PENDING,
            PaymentStatus::Approved => STATUS_APPROVED,
            PaymentStatus::Rejected => STATUS_REJECTED,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PaymentStatus::Pending)
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(PaymentStatus::Pending),
            STATUS_APPROVED => Ok(PaymentStatus::Approved),
            STATUS_REJECTED => Ok(PaymentStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "Unknown payment status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw payment details as entered by the paying user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitPayment {
    /// Amount in Algerian dinars
    pub amount: i64,
    pub plan_type: String,
    pub method: String,
    pub bank_name: Option<String>,
    /// Opaque pointer to the uploaded transfer receipt
    pub receipt_ref: Option<String>,
}

/// Admin verdict on a pending payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn resulting_status(&self) -> PaymentStatus {
        match self {
            Decision::Approve => PaymentStatus::Approved,
            Decision::Reject => PaymentStatus::Rejected,
        }
    }
}

/// Stamp written onto a payment when it leaves `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDecision {
    pub status: PaymentStatus,
    pub processed_by: Uuid,
    pub processed_at: DateTime<Utc>,
    pub admin_notes: Option<String>,
}

/// Subscription payment submitted for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub plan_type: PlanType,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_ref: Option<String>,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Subscription expiry granted if this payment is approved
    pub expires_at: DateTime<Utc>,
}

impl Payment {
    /// Build a pending payment from user input.
    ///
    /// Card submissions are refused before any other check so the user always
    /// learns that the method itself is unavailable.
    pub fn submit(user_id: Uuid, input: SubmitPayment, now: DateTime<Utc>) -> DomainResult<Self> {
        let method: PaymentMethod = input.method.trim().parse()?;
        if !is_method_available(method) {
            return Err(DomainError::MethodUnavailable(CARD_UNAVAILABLE_MESSAGE.to_string()));
        }

        if input.amount <= 0 {
            return Err(DomainError::validation("Amount must be greater than zero"));
        }

        let plan_type: PlanType = input.plan_type.trim().parse()?;

        let receipt_ref = non_blank(input.receipt_ref);
        if method == PaymentMethod::BankTransfer && receipt_ref.is_none() {
            return Err(DomainError::validation(
                "A transfer receipt is required for bank transfer payments",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            amount: input.amount,
            plan_type,
            payment_method: method,
            bank_name: non_blank(input.bank_name),
            receipt_ref,
            status: PaymentStatus::Pending,
            admin_notes: None,
            processed_by: None,
            processed_at: None,
            created_at: now,
            expires_at: subscription_expiry_from(now)?,
        })
    }

    /// Prepare the stamp for an admin decision; only pending payments qualify.
    pub fn decide(
        &self,
        decision: Decision,
        admin_id: Uuid,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> DomainResult<PaymentDecision> {
        if !self.status.is_pending() {
            return Err(DomainError::invalid_state(format!(
                "Payment {} has already been {}",
                self.id, self.status
            )));
        }

        Ok(PaymentDecision {
            status: decision.resulting_status(),
            processed_by: admin_id,
            processed_at: at,
            admin_notes: non_blank(notes),
        })
    }

    /// Apply a decision stamp in place.
    pub fn apply(&mut self, decision: &PaymentDecision) {
        self.status = decision.status;
        self.processed_by = Some(decision.processed_by);
        self.processed_at = Some(decision.processed_at);
        self.admin_notes = decision.admin_notes.clone();
    }
}

/// Outcome of a successful approval: the stamped payment and the profile
/// carrying the subscription it granted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Approval {
    pub payment: Payment,
    pub profile: crate::profile::Profile,
}

/// Fixed subscription term, independent of tier.
pub fn subscription_expiry_from(start: DateTime<Utc>) -> DomainResult<DateTime<Utc>> {
    start
        .checked_add_months(Months::new(SUBSCRIPTION_TERM_MONTHS))
        .ok_or_else(|| DomainError::validation("Subscription expiry is out of range"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
