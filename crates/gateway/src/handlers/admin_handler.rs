//! Administrator handlers: payment decisions, approval queue, registrations.
//!
//! Authorization is enforced by the services from the caller's `Actor`.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{Approval, Payment, PaymentStatus, PendingPayment, Profile, QueueOverview};

use crate::extractors::{ValidatedJson, ValidatedJsonOrDefault};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Optional note attached to an approve/reject decision; the body may be omitted
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct DecisionRequest {
    #[validate(length(max = 2000, message = "Notes are too long"))]
    #[schema(example = "Receipt matches bank statement")]
    pub notes: Option<String>,
}

/// Replacement admin notes; `null` clears them
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NotesRequest {
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPaymentsQuery {
    /// pending, approved or rejected
    pub status: Option<String>,
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments))
        .route("/payments/pending", get(list_pending_payments))
        .route("/payments/:id/approve", post(approve_payment))
        .route("/payments/:id/reject", post(reject_payment))
        .route("/payments/:id/resync", post(resync_subscription))
        .route("/payments/:id/notes", put(update_notes))
        .route("/queue", get(queue_overview))
        .route("/users/pending", get(list_pending_registrations))
        .route("/users/:id/activate", post(activate_user))
        .route("/users/:id/deactivate", post(deactivate_user))
}

/// List all payments, optionally filtered by status
#[utoipa::path(
    get,
    path = "/admin/payments",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(ListPaymentsQuery),
    responses(
        (status = 200, description = "Payments, newest first", body = Vec<Payment>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_payments(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> AppResult<Json<Vec<Payment>>> {
    let status = query
        .status
        .as_deref()
        .map(|s| s.parse::<PaymentStatus>())
        .transpose()?;

    let payments = state
        .services
        .payments()
        .list_all(current_user.actor(), status)
        .await?;
    Ok(Json(payments))
}

/// Pending payments with owner details, oldest first
#[utoipa::path(
    get,
    path = "/admin/payments/pending",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending payments", body = Vec<PendingPayment>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_pending_payments(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PendingPayment>>> {
    let pending = state
        .services
        .payments()
        .list_pending(current_user.actor())
        .await?;
    Ok(Json(pending))
}

/// Approve a pending payment and activate the owner's subscription
#[utoipa::path(
    post,
    path = "/admin/payments/{id}/approve",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Payment approved", body = Approval),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Payment or owner not found"),
        (status = 409, description = "Payment already decided"),
        (status = 500, description = "Payment approved but subscription not updated")
    )
)]
pub async fn approve_payment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJsonOrDefault(req): ValidatedJsonOrDefault<DecisionRequest>,
) -> AppResult<Json<Approval>> {
    let approval = state
        .services
        .subscriptions()
        .approve(current_user.actor(), id, req.notes)
        .await?;
    Ok(Json(approval))
}

/// Reject a pending payment
#[utoipa::path(
    post,
    path = "/admin/payments/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Payment rejected", body = Payment),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment already decided")
    )
)]
pub async fn reject_payment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJsonOrDefault(req): ValidatedJsonOrDefault<DecisionRequest>,
) -> AppResult<Json<Payment>> {
    let payment = state
        .services
        .subscriptions()
        .reject(current_user.actor(), id, req.notes)
        .await?;
    Ok(Json(payment))
}

/// Re-apply the subscription of an approved payment
#[utoipa::path(
    post,
    path = "/admin/payments/{id}/resync",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Subscription re-applied", body = Approval),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Payment or owner not found"),
        (status = 409, description = "Payment not approved or superseded")
    )
)]
pub async fn resync_subscription(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Approval>> {
    let approval = state
        .services
        .subscriptions()
        .resync_subscription(current_user.actor(), id)
        .await?;
    Ok(Json(approval))
}

/// Replace the admin notes of a payment in any status
#[utoipa::path(
    put,
    path = "/admin/payments/{id}/notes",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = NotesRequest,
    responses(
        (status = 200, description = "Notes updated", body = Payment),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn update_notes(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<NotesRequest>,
) -> AppResult<Json<Payment>> {
    let payment = state
        .services
        .payments()
        .update_notes(current_user.actor(), id, req.notes)
        .await?;
    Ok(Json(payment))
}

/// Everything awaiting a decision, with payment counts
#[utoipa::path(
    get,
    path = "/admin/queue",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Approval queue", body = QueueOverview),
        (status = 403, description = "Admin only")
    )
)]
pub async fn queue_overview(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<QueueOverview>> {
    let overview = state.services.queue().overview(current_user.actor()).await?;
    Ok(Json(overview))
}

/// Registrations awaiting activation, oldest first
#[utoipa::path(
    get,
    path = "/admin/users/pending",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inactive accounts", body = Vec<Profile>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_pending_registrations(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Profile>>> {
    let profiles = state
        .services
        .profiles()
        .list_pending_registrations(current_user.actor())
        .await?;
    Ok(Json(profiles))
}

/// Activate an account
#[utoipa::path(
    post,
    path = "/admin/users/{id}/activate",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account activated", body = Profile),
        (status = 400, description = "Administrator accounts are managed elsewhere"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn activate_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .services
        .profiles()
        .activate(current_user.actor(), id)
        .await?;
    Ok(Json(profile))
}

/// Deactivate an account
#[utoipa::path(
    post,
    path = "/admin/users/{id}/deactivate",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account deactivated", body = Profile),
        (status = 400, description = "Administrator accounts are managed elsewhere"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn deactivate_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .services
        .profiles()
        .deactivate(current_user.actor(), id)
        .await?;
    Ok(Json(profile))
}
