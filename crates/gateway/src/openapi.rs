//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::admin_handler::{DecisionRequest, NotesRequest};
use crate::handlers::payment_handler::SubmitPaymentRequest;
use domain::{
    Approval, Payment, PaymentMethod, PaymentStats, PaymentStatus, PendingPayment, PlanType,
    Profile, QueueOverview, SubscriptionTier, UserRole,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::payment_handler::submit_payment,
        crate::handlers::payment_handler::list_my_payments,
        crate::handlers::payment_handler::get_payment,
        crate::handlers::admin_handler::list_payments,
        crate::handlers::admin_handler::list_pending_payments,
        crate::handlers::admin_handler::approve_payment,
        crate::handlers::admin_handler::reject_payment,
        crate::handlers::admin_handler::resync_subscription,
        crate::handlers::admin_handler::update_notes,
        crate::handlers::admin_handler::queue_overview,
        crate::handlers::admin_handler::list_pending_registrations,
        crate::handlers::admin_handler::activate_user,
        crate::handlers::admin_handler::deactivate_user,
        crate::handlers::profile_handler::get_profile,
        crate::handlers::profile_handler::list_user_payments,
    ),
    components(
        schemas(
            SubmitPaymentRequest,
            DecisionRequest,
            NotesRequest,
            Payment,
            PaymentMethod,
            PaymentStatus,
            PlanType,
            PendingPayment,
            PaymentStats,
            QueueOverview,
            Approval,
            Profile,
            SubscriptionTier,
            UserRole,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Payments", description = "Subscription payment submission"),
        (name = "Admin", description = "Payment approval and account review"),
        (name = "Users", description = "Profiles and payment history"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
