//! Repository layer for data access.

pub mod entities;
mod payment_repository;
mod profile_repository;

pub(crate) use payment_repository::queries as payment_queries;
pub(crate) use profile_repository::queries as profile_queries;
pub use payment_repository::{PaymentFilter, PaymentRepository, PaymentStore, SortOrder};
pub use profile_repository::{ProfileRepository, ProfileStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use payment_repository::MockPaymentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::MockProfileRepository;
