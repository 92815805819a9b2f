//! Profile handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::AppResult;
use domain::{Payment, Profile};

use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_profile))
        .route("/:id/payments", get(list_user_payments))
}

/// Get profile with its current subscription (own profile or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Can only view own profile unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .services
        .profiles()
        .get_profile(current_user.actor(), id)
        .await?;
    Ok(Json(profile))
}

/// Payment history of a user, newest first (own history or admin)
#[utoipa::path(
    get,
    path = "/users/{id}/payments",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Payments", body = Vec<Payment>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Can only view own payments unless admin")
    )
)]
pub async fn list_user_payments(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Payment>>> {
    let payments = state
        .services
        .payments()
        .list_by_user(current_user.actor(), id)
        .await?;
    Ok(Json(payments))
}
