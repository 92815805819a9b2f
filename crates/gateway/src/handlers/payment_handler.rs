//! Payment submission and read handlers for paying users.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{Payment, SubmitPayment};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Payment submission request.
///
/// Amount, plan and method semantics are checked by the payment service so
/// that card submissions are always answered with the method-unavailable error.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitPaymentRequest {
    /// Amount in Algerian dinars
    #[schema(example = 12000)]
    pub amount: i64,
    #[validate(length(min = 1, max = 20, message = "Plan type is required"))]
    #[schema(example = "or")]
    pub plan_type: String,
    #[validate(length(min = 1, max = 30, message = "Payment method is required"))]
    #[schema(example = "bank_transfer")]
    pub method: String,
    #[validate(length(max = 100, message = "Bank name is too long"))]
    #[schema(example = "CPA")]
    pub bank_name: Option<String>,
    /// Reference of the uploaded transfer receipt
    #[validate(length(max = 512, message = "Receipt reference is too long"))]
    #[schema(example = "receipts/2024/03/r1.pdf")]
    pub receipt_ref: Option<String>,
}

impl From<SubmitPaymentRequest> for SubmitPayment {
    fn from(req: SubmitPaymentRequest) -> Self {
        SubmitPayment {
            amount: req.amount,
            plan_type: req.plan_type,
            method: req.method,
            bank_name: req.bank_name,
            receipt_ref: req.receipt_ref,
        }
    }
}

/// Create payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_payment))
        .route("/mine", get(list_my_payments))
        .route("/:id", get(get_payment))
}

/// Submit a subscription payment for review
#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = SubmitPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded as pending", body = Payment),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators cannot subscribe"),
        (status = 422, description = "Card payments are not available")
    )
)]
pub async fn submit_payment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SubmitPaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let payment = state
        .services
        .payments()
        .submit_payment(current_user.actor(), req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Payment history of the caller, newest first
#[utoipa::path(
    get,
    path = "/payments/mine",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's payments", body = Vec<Payment>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_payments(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Payment>>> {
    let payments = state
        .services
        .payments()
        .list_by_user(current_user.actor(), current_user.id)
        .await?;
    Ok(Json(payments))
}

/// Get payment by ID (owner or admin)
#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn get_payment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Payment>> {
    let payment = state
        .services
        .payments()
        .get_payment(current_user.actor(), id)
        .await?;
    Ok(Json(payment))
}
