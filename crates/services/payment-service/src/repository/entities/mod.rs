//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod payment;
pub mod profile;

#[allow(unused_imports)]
pub use payment::{ActiveModel as PaymentActiveModel, Entity as PaymentEntity, Model as PaymentModel};
#[allow(unused_imports)]
pub use profile::{ActiveModel as ProfileActiveModel, Entity as ProfileEntity, Model as ProfileModel};
