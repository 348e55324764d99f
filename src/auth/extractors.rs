//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tracing::{debug, warn};

use super::models::{Claims, Plan};
use super::services::{resolve_plan, upsert_user};
use crate::common::{safe_principal_log, ApiError, AppState};

/// Authenticated caller
///
/// This extractor validates the identity provider's token, resolves the principal
/// to an internal user (creating it on first contact) and resolves the caller's plan.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub principal_id: String,
    pub plan: Plan,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        // DEV MODE: Bypass token validation, still resolve the dev principal
        if app_state.dev_mode.is_enabled() {
            let dev = &app_state.dev_mode;
            let user = upsert_user(&app_state.db, &dev.principal_id, &dev.user_email).await?;
            let plan = if dev.user_is_premium {
                Plan::Premium
            } else {
                resolve_plan(&app_state.db, &user.id).await?
            };

            debug!(
                user_id = %user.id,
                plan = ?plan,
                "DEV MODE: Authentication bypassed"
            );

            return Ok(AuthedUser {
                id: user.id,
                principal_id: user.principal_id,
                plan,
            });
        }

        let principal_id = principal_from_header(parts, &app_state.jwt_secret)?;
        let user = upsert_user(&app_state.db, &principal_id, "").await?;
        let plan = resolve_plan(&app_state.db, &user.id).await?;

        debug!(
            user_id = %user.id,
            principal = %safe_principal_log(&principal_id),
            plan = ?plan,
            "User authentication successful via extractor"
        );

        Ok(AuthedUser {
            id: user.id,
            principal_id,
            plan,
        })
    }
}

/// Extracts and verifies the bearer token, returning the principal id
fn principal_from_header(parts: &Parts, jwt_secret: &str) -> Result<String, ApiError> {
    let token = match parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(t) => t,
        None => {
            warn!("Authentication failed: missing Authorization header");
            return Err(ApiError::Unauthorized("Unauthorized".into()));
        }
    };

    // Handle "Bearer <token>" format or raw token
    let bare_token = token.strip_prefix("Bearer ").unwrap_or(token);

    let decoded = decode::<Claims>(
        bare_token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        warn!(error = %e, "JWT token validation failed");
        ApiError::Unauthorized("Unauthorized".into())
    })?;

    if decoded.claims.sub.trim().is_empty() {
        warn!("Authentication failed: token has no principal");
        return Err(ApiError::Unauthorized("Unauthorized".into()));
    }

    Ok(decoded.claims.sub)
}
