//! Domain-level constants.
//!
//! These constants define business rules and the stored string forms of
//! domain enumerations.

// =============================================================================
// User Roles
// =============================================================================

/// Pharmacist account (buyer side of the marketplace)
pub const ROLE_PHARMACIST: &str = "pharmacist";

/// Supplier account (publishes listings and offers)
pub const ROLE_SUPPLIER: &str = "supplier";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_PHARMACIST, ROLE_SUPPLIER, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Subscription tiers
// =============================================================================

pub const TIER_NONE: &str = "none";
pub const TIER_BRONZE: &str = "bronze";
pub const TIER_ARGENT: &str = "argent";
pub const TIER_OR: &str = "or";

/// Tiers a payment can buy
pub const PAID_TIERS: &[&str] = &[TIER_BRONZE, TIER_ARGENT, TIER_OR];

/// Length of a paid subscription, counted from payment submission
pub const SUBSCRIPTION_TERM_MONTHS: u32 = 12;

// =============================================================================
// Payments
// =============================================================================

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

pub const METHOD_BANK_TRANSFER: &str = "bank_transfer";
pub const METHOD_CARD: &str = "card";

/// Message shown whenever a card payment is attempted
pub const CARD_UNAVAILABLE_MESSAGE: &str =
    "Card payments are currently unavailable. Please pay by bank transfer and upload your receipt.";

// =============================================================================
// Authentication
// =============================================================================

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
