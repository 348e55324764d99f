//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Budgets a free account may hold
pub const FREE_BUDGET_LIMIT: i64 = 10;

/// JWT claims issued by the identity provider; `sub` is the principal id
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub principal_id: String,
    pub email: String,
    pub created_at: String,
}

/// Subscription capability of the caller, resolved once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
}

impl Plan {
    /// Maximum number of budgets, `None` when unbounded
    pub fn budget_limit(&self) -> Option<i64> {
        match self {
            Plan::Free => Some(FREE_BUDGET_LIMIT),
            Plan::Premium => None,
        }
    }

    /// Whether `incoming` more budgets fit next to `existing` ones
    pub fn allows(&self, existing: i64, incoming: usize) -> bool {
        match self.budget_limit() {
            Some(limit) => existing.saturating_add(incoming as i64) <= limit,
            None => true,
        }
    }
}

/// Response body of `GET /api/me`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    pub plan: Plan,
    pub budget_limit: Option<i64>,
}
