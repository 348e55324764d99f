// src/common/json.rs
//! JSON body extractor that reports failures as `ApiError`

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::ApiError;

/// Like `axum::Json`, but malformed bodies become `{error, code}` 400 responses
/// and only a JSON object is accepted at the top level.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection, "Rejected malformed JSON body");
                invalid_body()
            })?;

        if !value.is_object() {
            warn!("Rejected JSON body that is not an object");
            return Err(invalid_body());
        }

        serde_json::from_value(value).map(ApiJson).map_err(|e| {
            warn!(error = %e, "JSON body does not match the expected shape");
            invalid_body()
        })
    }
}

fn invalid_body() -> ApiError {
    ApiError::BadRequest("Invalid request body".to_string())
}
