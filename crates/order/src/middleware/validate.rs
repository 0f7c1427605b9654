use crate::domain::requests::validation_messages;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use shared::errors::HttpError;
use validator::{Validate, ValidationErrors};

fn validation_failed(errors: &ValidationErrors) -> HttpError {
    HttpError::BadRequest(format!(
        "Validation failed: {}",
        validation_messages(errors).join("; ")
    ))
}

/// JSON body that has passed `validator` checks. Any rejection is a 400.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                HttpError::BadRequest(format!("Invalid JSON: {}", rejection.body_text()))
            })?;

        value.validate().map_err(|e| validation_failed(&e))?;

        Ok(Self(value))
    }
}

/// Query string that has passed `validator` checks. Any rejection is a 400.
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                HttpError::BadRequest(format!("Invalid query: {}", rejection.body_text()))
            })?;

        value.validate().map_err(|e| validation_failed(&e))?;

        Ok(Self(value))
    }
}
