//! Bearer token authentication.
//!
//! Tokens are issued by the upstream identity service; the gateway only
//! verifies them and turns the claims into an explicit [`Actor`].

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Actor, UserRole, BEARER_TOKEN_PREFIX};

use crate::state::AppState;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Current authenticated user extracted from JWT.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl CurrentUser {
    /// Identity passed into every service call
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

/// Verify an HS256 token and resolve its caller.
pub fn verify_token(token: &str, key: &DecodingKey) -> AppResult<CurrentUser> {
    let data = decode::<Claims>(token, key, &Validation::new(Algorithm::HS256))?;

    // A token carrying a role we do not know grants nothing
    let role = data
        .claims
        .role
        .parse::<UserRole>()
        .map_err(|_| AppError::Unauthorized)?;

    Ok(CurrentUser {
        id: data.claims.sub,
        role,
    })
}

/// Authentication middleware that validates JWT tokens.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let current_user = verify_token(token, &state.jwt_key)?;
    tracing::debug!(user_id = %current_user.id, role = %current_user.role, "request authenticated");

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
