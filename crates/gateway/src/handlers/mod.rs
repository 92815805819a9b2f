//! HTTP handlers.

pub mod admin_handler;
pub mod health_handler;
pub mod payment_handler;
pub mod profile_handler;

pub use admin_handler::admin_routes;
pub use health_handler::health_routes;
pub use payment_handler::payment_routes;
pub use profile_handler::profile_routes;
