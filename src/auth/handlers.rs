//! Authentication handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::debug;

use super::extractors::AuthedUser;
use super::models::{MeResponse, User};
use crate::common::{safe_principal_log, ApiError, AppState};

/// GET /api/me
/// Returns the caller's internal user record and plan
///
/// # Response
/// ```json
/// {
///   "user": { "id": "U_...", "principalId": "...", "email": "", "createdAt": "..." },
///   "plan": "free",
///   "budgetLimit": 10
/// }
/// ```
pub async fn me_handler(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, principal_id, email, created_at FROM users WHERE id = ?",
    )
    .bind(&authed.id)
    .fetch_one(&state.db)
    .await?;

    debug!(
        user_id = %user.id,
        principal = %safe_principal_log(&authed.principal_id),
        "Resolved current user"
    );

    Ok(Json(MeResponse {
        user,
        plan: authed.plan,
        budget_limit: authed.plan.budget_limit(),
    }))
}
