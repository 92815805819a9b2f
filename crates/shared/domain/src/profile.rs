//! Profile domain entity and related value types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    ROLE_ADMIN, ROLE_PHARMACIST, ROLE_SUPPLIER, TIER_ARGENT, TIER_BRONZE, TIER_NONE, TIER_OR,
};
use crate::error::DomainError;
use crate::payment::PlanType;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Pharmacist,
    Supplier,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Pharmacist => ROLE_PHARMACIST,
            UserRole::Supplier => ROLE_SUPPLIER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_PHARMACIST => Ok(UserRole::Pharmacist),
            ROLE_SUPPLIER => Ok(UserRole::Supplier),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(DomainError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription level currently held by a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    None,
    Bronze,
    Argent,
    Or,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::None => TIER_NONE,
            SubscriptionTier::Bronze => TIER_BRONZE,
            SubscriptionTier::Argent => TIER_ARGENT,
            SubscriptionTier::Or => TIER_OR,
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TIER_NONE => Ok(SubscriptionTier::None),
            TIER_BRONZE => Ok(SubscriptionTier::Bronze),
            TIER_ARGENT => Ok(SubscriptionTier::Argent),
            TIER_OR => Ok(SubscriptionTier::Or),
            other => Err(DomainError::validation(format!(
                "Unknown subscription tier '{}'",
                other
            ))),
        }
    }
}

impl From<PlanType> for SubscriptionTier {
    fn from(plan: PlanType) -> Self {
        match plan {
            PlanType::Bronze => SubscriptionTier::Bronze,
            PlanType::Argent => SubscriptionTier::Argent,
            PlanType::Or => SubscriptionTier::Or,
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marketplace account profile.
///
/// `subscription_tier` and `subscription_expiry` are a projection of the
/// most recently approved payment and are only written by the approval flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Profile {
    pub id: Uuid,
    pub business_name: String,
    pub role: UserRole,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Administrative region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wilaya: Option<String>,
    pub is_active: bool,
    pub subscription_tier: SubscriptionTier,
    pub subscription_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Check if profile has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// A subscription counts only while its expiry lies in the future.
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        self.subscription_tier != SubscriptionTier::None
            && self.subscription_expiry.is_some_and(|expiry| expiry > now)
    }

    /// Label shown next to a payment in the admin queue
    pub fn display_name(&self) -> &str {
        &self.business_name
    }
}
