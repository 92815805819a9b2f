//! Validated JSON extractor.

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// JSON extractor that validates the payload before the handler runs.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Like [`ValidatedJson`], but a request without a body yields `T::default()`.
pub struct ValidatedJsonOrDefault<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJsonOrDefault<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Default,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.headers().contains_key(CONTENT_TYPE) {
            let ValidatedJson(value) = ValidatedJson::<T>::from_request(req, state).await?;
            return Ok(ValidatedJsonOrDefault(value));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        if !body.is_empty() {
            return Err(AppError::validation(
                "Expected request with `Content-Type: application/json`",
            ));
        }
        Ok(ValidatedJsonOrDefault(T::default()))
    }
}

/// `field: message` pairs, sorted by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: invalid value", field),
            })
        })
        .collect();

    if messages.is_empty() {
        return "Validation failed".to_string();
    }
    messages.sort();
    messages.join("; ")
}
