//! Payment service configuration.

use std::env;
use std::str::FromStr;

use common::DatabaseConfig;

/// How `approve` commits its two writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalMode {
    /// Payment stamp and subscription write share one database transaction
    #[default]
    Transactional,
    /// Independent writes; a failed profile write surfaces `PartialApply`
    TwoPhase,
}

impl FromStr for ApprovalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" => Ok(ApprovalMode::Transactional),
            "two_phase" | "two-phase" => Ok(ApprovalMode::TwoPhase),
            other => Err(format!("unknown approval mode '{}'", other)),
        }
    }
}

/// Payment service configuration.
#[derive(Debug, Clone, Default)]
pub struct PaymentServiceConfig {
    pub database: DatabaseConfig,
    pub approval_mode: ApprovalMode,
}

impl PaymentServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let approval_mode = match env::var("PAYMENT_APPROVAL_MODE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; falling back to transactional approvals", e);
                ApprovalMode::Transactional
            }),
            Err(_) => ApprovalMode::Transactional,
        };

        Self {
            database: DatabaseConfig::from_env(),
            approval_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_approval_mode() {
        assert_eq!("transactional".parse(), Ok(ApprovalMode::Transactional));
        assert_eq!("Two_Phase".parse(), Ok(ApprovalMode::TwoPhase));
        assert!("eventually".parse::<ApprovalMode>().is_err());
    }
}
