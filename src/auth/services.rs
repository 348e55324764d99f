//! Principal and plan resolution against the users and subscriptions tables

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{Plan, User};
use crate::common::helpers::now_timestamp;
use crate::common::{generate_user_id, safe_principal_log, ApiError};

/// Resolves a principal id to its internal user, creating the user on first contact.
pub async fn resolve_principal(db: &SqlitePool, principal_id: &str) -> Result<User, ApiError> {
    upsert_user(db, principal_id, "").await
}

/// Insert-if-absent keyed by the unique principal id, then read back.
/// Concurrent first requests for one principal end up on the same row.
pub async fn upsert_user(
    db: &SqlitePool,
    principal_id: &str,
    email: &str,
) -> Result<User, ApiError> {
    let now = now_timestamp();

    let inserted = sqlx::query(
        r#"
        INSERT INTO users (id, principal_id, email, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(principal_id) DO NOTHING
        "#,
    )
    .bind(generate_user_id())
    .bind(principal_id)
    .bind(email)
    .bind(&now)
    .execute(db)
    .await?;

    if inserted.rows_affected() > 0 {
        info!(
            principal = %safe_principal_log(principal_id),
            "Created user on first authenticated request"
        );
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, principal_id, email, created_at FROM users WHERE principal_id = ?",
    )
    .bind(principal_id)
    .fetch_one(db)
    .await?;

    Ok(user)
}

/// Reads the caller's subscription state. No row, an inactive row or a lapsed
/// period all resolve to the free plan.
pub async fn resolve_plan(db: &SqlitePool, user_id: &str) -> Result<Plan, ApiError> {
    let subscription: Option<(bool, Option<String>)> = sqlx::query_as(
        "SELECT active, current_period_end FROM subscriptions WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(match subscription {
        Some((true, None)) => Plan::Premium,
        Some((true, Some(period_end))) => match DateTime::parse_from_rfc3339(&period_end) {
            Ok(end) if end.with_timezone(&Utc) > Utc::now() => Plan::Premium,
            Ok(_) => Plan::Free,
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    error = %e,
                    "Unreadable subscription period end, treating as free plan"
                );
                Plan::Free
            }
        },
        _ => Plan::Free,
    })
}
